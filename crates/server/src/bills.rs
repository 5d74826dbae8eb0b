//! Bill API endpoints.

use api_types::bill::{
    BillKind, BillList, BillListResponse, BillNew, BillUpdate, BillView, BillWithTagsView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, tags::tag_view};

pub(crate) fn bill_view(bill: engine::Bill) -> BillView {
    BillView {
        id: bill.id,
        account_book_id: bill.account_book_id,
        user_id: bill.user_id,
        amount_minor: bill.amount_minor,
        kind: match bill.kind {
            engine::BillKind::Income => BillKind::Income,
            engine::BillKind::Expense => BillKind::Expense,
        },
        remark: bill.remark,
        image_url: bill.image_url,
        occurred_at: bill.occurred_at,
        created_at: bill.created_at,
        updated_at: bill.updated_at,
    }
}

fn bill_with_tags_view(entry: engine::BillWithTags) -> BillWithTagsView {
    BillWithTagsView {
        bill: bill_view(entry.bill),
        tags: entry.tags.into_iter().map(tag_view).collect(),
    }
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<BillNew>,
) -> Result<(StatusCode, Json<BillView>), ServerError> {
    let bill = state
        .engine
        .create_bill(
            book_id,
            user.id,
            engine::NewBill {
                amount_minor: payload.amount_minor,
                kind: payload.kind.as_str().to_string(),
                remark: payload.remark,
                image_url: payload.image_url,
                occurred_at: payload.occurred_at,
                tag_ids: payload.tag_ids,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(bill_view(bill))))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<BillWithTagsView>, ServerError> {
    let entry = state.engine.bill_with_tags(bill_id, user.id).await?;
    Ok(Json(bill_with_tags_view(entry)))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
    payload: Option<Json<BillList>>,
) -> Result<Json<BillListResponse>, ServerError> {
    let payload = payload.map(|Json(list)| list).unwrap_or_default();
    let (bills, total) = state
        .engine
        .list_bills(
            book_id,
            user.id,
            engine::BillListFilter {
                page: payload.page,
                page_size: payload.page_size,
                kind: payload.kind.map(|kind| kind.as_str().to_string()),
                tag_ids: payload.tag_ids,
                start_time: payload.start_time,
                end_time: payload.end_time,
                min_amount_minor: payload.min_amount_minor,
                max_amount_minor: payload.max_amount_minor,
                keyword: payload.keyword,
            },
        )
        .await?;

    Ok(Json(BillListResponse {
        bills: bills.into_iter().map(bill_with_tags_view).collect(),
        total,
    }))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(bill_id): Path<Uuid>,
    Json(payload): Json<BillUpdate>,
) -> Result<Json<BillView>, ServerError> {
    let bill = state
        .engine
        .update_bill(
            bill_id,
            user.id,
            engine::BillUpdate {
                amount_minor: payload.amount_minor,
                kind: payload.kind.as_str().to_string(),
                remark: payload.remark,
                image_url: payload.image_url,
                occurred_at: payload.occurred_at,
                tag_ids: payload.tag_ids,
            },
        )
        .await?;

    Ok(Json(bill_view(bill)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(bill_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_bill(bill_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
