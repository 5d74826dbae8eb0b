use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();

    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn request(method: &str, uri: &str, subject: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(subject) = subject {
        builder = builder
            .header("x-identity-provider", "wechat")
            .header("x-identity-subject", subject);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_identity_headers_are_unauthorized() {
    let app = app().await;

    let response = app
        .oneshot(request("GET", "/user", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn the_identity_pair_resolves_to_a_stable_user() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/user", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = json_body(response).await;

    let response = app
        .oneshot(request("GET", "/user", Some("alice"), None))
        .await
        .unwrap();
    let second = json_body(response).await;

    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn tag_creation_conflicts_map_to_409() {
    let app = app().await;

    let payload = json!({"name": "food", "kind": "meals", "category": "bill"});

    let response = app
        .clone()
        .oneshot(request("POST", "/tags", Some("alice"), Some(payload.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("POST", "/tags", Some("alice"), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(request("GET", "/tags", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tags"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn diary_likes_round_trip_over_http() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/diaries",
            Some("alice"),
            Some(json!({
                "title": "Lisbon",
                "content": "Tram 28",
                "level": "public"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let diary = json_body(response).await;
    let diary_id = diary["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/diaries/{diary_id}/like"),
            Some("bob"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/diaries/{diary_id}/like"),
            Some("bob"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/diaries/{diary_id}/like"),
            Some("bob"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["liked"], json!(true));

    let response = app
        .oneshot(request(
            "GET",
            &format!("/diaries/{diary_id}"),
            Some("alice"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["diary"]["like_count"], json!(1));
}

#[tokio::test]
async fn only_the_book_administrator_grants_access() {
    let app = app().await;

    // Resolve ids for the three identities up front.
    let mut ids = Vec::new();
    for subject in ["alice", "bob", "carol"] {
        let response = app
            .clone()
            .oneshot(request("GET", "/user", Some(subject), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    let (bob_id, carol_id) = (ids[1].clone(), ids[2].clone());

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/accountBooks",
            Some("alice"),
            Some(json!({"name": "Household"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let book = json_body(response).await;
    let book_id = book["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/accountBooks/{book_id}/users"),
            Some("alice"),
            Some(json!({"user_id": bob_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["granted"], json!(true));

    // Bob is an associate but not the administrator.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/accountBooks/{book_id}/users"),
            Some("bob"),
            Some(json!({"user_id": carol_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Granting an existing associate again is a notice, not an error.
    let response = app
        .oneshot(request(
            "POST",
            &format!("/accountBooks/{book_id}/users"),
            Some("alice"),
            Some(json!({"user_id": bob_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["granted"], json!(false));
    assert!(body["notice"].is_string());
}

#[tokio::test]
async fn statistics_come_back_zeroed_for_an_empty_book() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/accountBooks",
            Some("alice"),
            Some(json!({"name": "Empty"})),
        ))
        .await
        .unwrap();
    let book = json_body(response).await;
    let book_id = book["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            "GET",
            &format!("/accountBooks/{book_id}/stats"),
            Some("alice"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_income_minor"], json!(0));
    assert_eq!(body["total_expense_minor"], json!(0));
    assert_eq!(body["net_minor"], json!(0));
}
