//! Profile endpoints for the authenticated user.

use api_types::user::{ProfileUpdate, UserView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState};

pub(crate) fn user_view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        user_name: user.user_name,
        avatar: user.avatar,
        email: user.email,
    }
}

pub async fn profile(
    Extension(user): Extension<engine::User>,
) -> Result<Json<UserView>, ServerError> {
    Ok(Json(user_view(user)))
}

pub async fn update_profile(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let updated = state
        .engine
        .update_user_profile(
            user.id,
            engine::UserProfileUpdate {
                user_name: payload.user_name,
                avatar: payload.avatar,
                email: payload.email,
            },
        )
        .await?;

    Ok(Json(user_view(updated)))
}
