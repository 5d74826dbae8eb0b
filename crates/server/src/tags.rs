//! Tag API endpoints.

use api_types::tag::{TagCategory, TagList, TagNew, TagUpdate, TagView, TagsResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn tag_view(tag: engine::Tag) -> TagView {
    TagView {
        id: tag.id,
        name: tag.name,
        kind: tag.kind,
        category: match tag.category {
            engine::TagCategory::Bill => TagCategory::Bill,
            engine::TagCategory::Diary => TagCategory::Diary,
        },
        created_at: tag.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TagNew>,
) -> Result<(StatusCode, Json<TagView>), ServerError> {
    let tag = state
        .engine
        .create_tag(&payload.name, &payload.kind, payload.category.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(tag_view(tag))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(tag_id): Path<Uuid>,
) -> Result<Json<TagView>, ServerError> {
    let tag = state.engine.tag(tag_id).await?;
    Ok(Json(tag_view(tag)))
}

pub async fn list(
    State(state): State<ServerState>,
    payload: Option<Json<TagList>>,
) -> Result<Json<TagsResponse>, ServerError> {
    let category = payload
        .and_then(|Json(list)| list.category)
        .map(TagCategory::as_str);
    let tags = state.engine.list_tags(category).await?;

    Ok(Json(TagsResponse {
        tags: tags.into_iter().map(tag_view).collect(),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(tag_id): Path<Uuid>,
    Json(payload): Json<TagUpdate>,
) -> Result<Json<TagView>, ServerError> {
    let tag = state
        .engine
        .update_tag(
            tag_id,
            &payload.name,
            &payload.kind,
            payload.category.as_str(),
        )
        .await?;

    Ok(Json(tag_view(tag)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(tag_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tag(tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
