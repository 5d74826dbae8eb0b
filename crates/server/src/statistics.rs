//! Statistics API endpoints.

use api_types::stats::{GroupBucketView, Statistic, StatisticQuery};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Handle requests for account-book statistics.
pub async fn get_stats(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
    payload: Option<Json<StatisticQuery>>,
) -> Result<Json<Statistic>, ServerError> {
    let payload = payload.map(|Json(query)| query).unwrap_or_default();
    let stats = state
        .engine
        .bill_statistics(
            book_id,
            user.id,
            payload.start_time,
            payload.end_time,
            payload.group_by.as_deref(),
        )
        .await?;

    Ok(Json(Statistic {
        total_income_minor: stats.total_income_minor,
        total_expense_minor: stats.total_expense_minor,
        net_minor: stats.net_minor,
        tag_stats: stats.tag_stats,
        group_stats: stats
            .group_stats
            .into_iter()
            .map(|bucket| GroupBucketView {
                key: bucket.key,
                income_minor: bucket.income_minor,
                expense_minor: bucket.expense_minor,
                net_minor: bucket.net_minor,
            })
            .collect(),
    }))
}
