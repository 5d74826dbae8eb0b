//! Diary API endpoints.

use api_types::account_book::GrantResponse;
use api_types::diary::{
    DiaryDetailsResponse, DiaryList, DiaryListResponse, DiaryNew, DiaryShare, DiaryUpdate,
    DiaryView, LikedResponse, PermissionLevel,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, tags::tag_view};
use engine::EngineError;

pub(crate) fn diary_view(diary: engine::Diary) -> DiaryView {
    DiaryView {
        id: diary.id,
        title: diary.title,
        content: diary.content,
        address: diary.address,
        pageview: diary.pageview,
        like_count: diary.like_count,
        created_at: diary.created_at,
        updated_at: diary.updated_at,
    }
}

fn level_view(level: engine::PermissionLevel) -> PermissionLevel {
    match level {
        engine::PermissionLevel::Private => PermissionLevel::Private,
        engine::PermissionLevel::Public => PermissionLevel::Public,
        engine::PermissionLevel::SharedRead => PermissionLevel::SharedRead,
        engine::PermissionLevel::SharedEdit => PermissionLevel::SharedEdit,
    }
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<DiaryNew>,
) -> Result<(StatusCode, Json<DiaryView>), ServerError> {
    let diary = state
        .engine
        .create_diary(
            user.id,
            engine::NewDiary {
                title: payload.title,
                content: payload.content,
                address: payload.address,
                level: payload.level.as_str().to_string(),
                tag_ids: payload.tag_ids,
                image_urls: payload.image_urls,
                video_urls: payload.video_urls,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(diary_view(diary))))
}

pub async fn details(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
) -> Result<Json<DiaryDetailsResponse>, ServerError> {
    let details = state.engine.diary_details(diary_id, user.id).await?;

    Ok(Json(DiaryDetailsResponse {
        diary: diary_view(details.diary),
        tags: details.tags.into_iter().map(tag_view).collect(),
        level: level_view(details.level),
        image_urls: details.image_urls,
        video_urls: details.video_urls,
    }))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    payload: Option<Json<DiaryList>>,
) -> Result<Json<DiaryListResponse>, ServerError> {
    let payload = payload.map(|Json(list)| list).unwrap_or_default();
    let (diaries, total) = state
        .engine
        .list_diaries(
            user.id,
            engine::DiaryListFilter {
                page: payload.page,
                page_size: payload.page_size,
                keyword: payload.keyword,
                tag_ids: payload.tag_ids,
                level: payload.level.map(|level| level.as_str().to_string()),
            },
        )
        .await?;

    Ok(Json(DiaryListResponse {
        diaries: diaries.into_iter().map(diary_view).collect(),
        total,
    }))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
    Json(payload): Json<DiaryUpdate>,
) -> Result<Json<DiaryView>, ServerError> {
    let diary = state
        .engine
        .update_diary(
            diary_id,
            user.id,
            engine::DiaryUpdate {
                title: payload.title,
                content: payload.content,
                address: payload.address,
                level: payload.level.map(|level| level.as_str().to_string()),
                tag_ids: payload.tag_ids,
                image_urls: payload.image_urls,
                video_urls: payload.video_urls,
            },
        )
        .await?;

    Ok(Json(diary_view(diary)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_diary(diary_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shares a diary with another user. Sharing with someone who already has
/// access is benign: the end state matches the caller's intent, so it is
/// reported as a notice rather than an error.
pub async fn share(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
    Json(payload): Json<DiaryShare>,
) -> Result<Json<GrantResponse>, ServerError> {
    match state
        .engine
        .share_diary(diary_id, user.id, payload.user_id)
        .await
    {
        Ok(()) => Ok(Json(GrantResponse {
            granted: true,
            notice: None,
        })),
        Err(EngineError::AlreadyGranted(notice)) => Ok(Json(GrantResponse {
            granted: false,
            notice: Some(notice),
        })),
        Err(err) => Err(err.into()),
    }
}

pub async fn like(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.like_diary(diary_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.unlike_diary(diary_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn liked(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(diary_id): Path<Uuid>,
) -> Result<Json<LikedResponse>, ServerError> {
    let liked = state.engine.has_liked(diary_id, user.id).await?;
    Ok(Json(LikedResponse { liked }))
}
