//! Account book endpoints, including access management.
//!
//! Granting and revoking access is administrator-only: the holder of the
//! earliest association row. This is stricter than diary sharing on
//! purpose.

use api_types::account_book::{
    AccessGrant, AccountBookNew, AccountBookRename, AccountBookView, AccountBooksResponse,
    BookUsersResponse, GrantResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, users::user_view};
use engine::EngineError;

fn book_view(book: engine::AccountBook) -> AccountBookView {
    AccountBookView {
        id: book.id,
        name: book.name,
        created_at: book.created_at,
        updated_at: book.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountBookNew>,
) -> Result<(StatusCode, Json<AccountBookView>), ServerError> {
    let book = state
        .engine
        .create_account_book(user.id, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(book_view(book))))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<AccountBooksResponse>, ServerError> {
    let books = state.engine.list_account_books(user.id).await?;

    Ok(Json(AccountBooksResponse {
        account_books: books.into_iter().map(book_view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<AccountBookView>, ServerError> {
    let book = state.engine.account_book(book_id, user.id).await?;
    Ok(Json(book_view(book)))
}

pub async fn rename(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<AccountBookRename>,
) -> Result<Json<AccountBookView>, ServerError> {
    let book = state
        .engine
        .rename_account_book(book_id, user.id, &payload.name)
        .await?;

    Ok(Json(book_view(book)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account_book(book_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn users(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookUsersResponse>, ServerError> {
    let users = state
        .engine
        .list_account_book_users(book_id, user.id)
        .await?;

    Ok(Json(BookUsersResponse {
        users: users.into_iter().map(user_view).collect(),
    }))
}

/// Grants a user access to the book. Granting to a user who already has
/// access is benign and reported as a notice.
pub async fn grant(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<AccessGrant>,
) -> Result<Json<GrantResponse>, ServerError> {
    match state
        .engine
        .grant_ledger_access(book_id, user.id, payload.user_id)
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

pub async fn revoke(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path((book_id, target_user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .revoke_ledger_access(book_id, user.id, target_user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
