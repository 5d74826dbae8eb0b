use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};

use std::sync::Arc;

use crate::{account_books, bills, diaries, statistics, tags, users};
use engine::Engine;

static IDENTITY_PROVIDER_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-identity-provider");
static IDENTITY_SUBJECT_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-identity-subject");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves the verified external identity carried by the request headers
/// to the internal user, creating it on first login.
///
/// Token verification itself happens upstream; by the time a request
/// reaches this service the identity pair is trusted.
async fn identity(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provider = request
        .headers()
        .get(&IDENTITY_PROVIDER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let subject = request
        .headers()
        .get(&IDENTITY_SUBJECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let (Some(provider), Some(subject)) = (provider, subject) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if provider.is_empty() || subject.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .resolve_or_create_user(&provider, &subject)
        .await
        .map_err(|err| {
            tracing::error!("identity resolution failed: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/user", get(users::profile).patch(users::update_profile))
        .route("/diaries", post(diaries::create).get(diaries::list))
        .route(
            "/diaries/{diary_id}",
            get(diaries::details)
                .patch(diaries::update)
                .delete(diaries::delete),
        )
        .route("/diaries/{diary_id}/share", post(diaries::share))
        .route(
            "/diaries/{diary_id}/like",
            post(diaries::like)
                .delete(diaries::unlike)
                .get(diaries::liked),
        )
        .route("/tags", post(tags::create).get(tags::list))
        .route(
            "/tags/{tag_id}",
            get(tags::get).put(tags::update).delete(tags::delete),
        )
        .route(
            "/accountBooks",
            post(account_books::create).get(account_books::list),
        )
        .route(
            "/accountBooks/{book_id}",
            get(account_books::get)
                .patch(account_books::rename)
                .delete(account_books::delete),
        )
        .route(
            "/accountBooks/{book_id}/users",
            get(account_books::users).post(account_books::grant),
        )
        .route(
            "/accountBooks/{book_id}/users/{user_id}",
            delete(account_books::revoke),
        )
        .route(
            "/accountBooks/{book_id}/bills",
            post(bills::create).get(bills::list),
        )
        .route("/accountBooks/{book_id}/stats", get(statistics::get_stats))
        .route(
            "/bills/{bill_id}",
            get(bills::get).put(bills::update).delete(bills::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), identity))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
