//! End-to-end HTTP tests against the assembled router.
//!
//! Uses in-memory repositories, the process-local revocation store and a stub
//! metadata fetcher, so no network access is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use learnhub_auth::{Argon2Hasher, InMemoryRevokedTokenStorage};
use learnhub_server::metadata::{MetadataError, MetadataFetcher};
use learnhub_server::repository::{
    InMemoryContentRepository, InMemoryUserRepository, VideoMetadata,
};
use learnhub_server::{AppConfig, AppState, StateParts, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

struct StubMetadata;

#[async_trait]
impl MetadataFetcher for StubMetadata {
    async fn fetch(&self, video_url: &str) -> Result<VideoMetadata, MetadataError> {
        Ok(VideoMetadata {
            video_title: format!("Title of {video_url}"),
            thumbnail_url: "https://img.example.com/thumb.jpg".into(),
            creator_name: "Creator".into(),
            creator_url: "https://example.com/creator".into(),
        })
    }
}

fn app() -> Router {
    let cfg = AppConfig::default();
    let state = AppState::new(
        &cfg,
        StateParts {
            users: Arc::new(InMemoryUserRepository::new()),
            contents: Arc::new(InMemoryContentRepository::new()),
            revoked_tokens: Arc::new(InMemoryRevokedTokenStorage::new()),
            metadata: Arc::new(StubMetadata),
            hasher: Arc::new(Argon2Hasher),
        },
    );
    build_router(&cfg, state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "username": username, "password": password, "name": username })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "logged in");
    assert_eq!(body["username"], username);
    body["token"].as_str().unwrap().to_string()
}

async fn post_content(app: &Router, token: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/content",
        Some(token),
        Some(json!({
            "videoUrl": "https://www.youtube.com/watch?v=abc",
            "comment": "worth watching",
            "rating": 4
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_health_check() {
    let response = send(&app(), Method::GET, "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_non_owner_denied_then_logout_revokes() {
    let app = app();
    let alice = register(&app, "alice", "alice-pw").await;
    register(&app, "bob", "bob-pw").await;

    let bob_token = login(&app, "bob", "bob-pw").await;
    let content = post_content(&app, &bob_token).await;
    let content_uri = format!("/content/{}", content["id"]);

    let alice_token = login(&app, "alice", "alice-pw").await;

    let response = send(
        &app,
        Method::PATCH,
        &content_uri,
        Some(&alice_token),
        Some(json!({ "comment": "hijacked", "rating": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &content_uri, Some(&alice_token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::GET, "/user/logout", Some(&alice_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "logged out");
    assert_eq!(body["token"], alice_token.as_str());

    for (method, uri) in [
        (Method::GET, "/content"),
        (Method::GET, content_uri.as_str()),
        (Method::GET, "/user/logout"),
    ] {
        let response = send(&app, method, uri, Some(&alice_token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "authentication failed" })
        );
    }

    // Bob's session is unaffected by Alice's logout.
    let response = send(&app, Method::GET, &content_uri, Some(&bob_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A fresh login gives Alice a working token again.
    let alice_again = login(&app, "alice", "alice-pw").await;
    assert_ne!(alice_again, alice_token);
    let response = send(&app, Method::GET, "/content", Some(&alice_again), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(alice["id"], content["postedBy"]["id"]);
}

#[tokio::test]
async fn test_owner_can_update_and_delete() {
    let app = app();
    let bob = register(&app, "bob", "bob-pw").await;
    let token = login(&app, "bob", "bob-pw").await;

    let content = post_content(&app, &token).await;
    assert_eq!(content["postedBy"]["id"], bob["id"]);
    assert_eq!(content["postedBy"]["username"], "bob");
    assert_eq!(
        content["videoTitle"],
        "Title of https://www.youtube.com/watch?v=abc"
    );
    assert_eq!(content["creatorName"], "Creator");
    let uri = format!("/content/{}", content["id"]);

    let response = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({ "comment": "changed my mind", "rating": 2 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["comment"], "changed my mind");
    assert_eq!(updated["rating"], 2);

    let response = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], content["id"]);

    let response = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_list_and_bad_input() {
    let app = app();
    register(&app, "carol", "carol-pw").await;
    let token = login(&app, "carol", "carol-pw").await;
    post_content(&app, &token).await;
    post_content(&app, &token).await;

    let response = send(&app, Method::GET, "/content", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);

    let response = send(&app, Method::GET, "/content/abc", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "id abc is not a number" })
    );

    let response = send(&app, Method::GET, "/content/999", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::POST,
        "/content",
        Some(&token),
        Some(json!({ "videoUrl": "https://www.youtube.com/watch?v=abc", "rating": 3 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/content",
        Some(&token),
        Some(json!({
            "videoUrl": "https://www.youtube.com/watch?v=abc",
            "comment": "too good",
            "rating": 11
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_requires_authentication() {
    let app = app();

    let response = send(&app, Method::GET, "/content", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let response = send(&app, Method::GET, "/content", Some("not-a-token"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_and_conflict() {
    let app = app();

    let created = register(&app, "dave", "dave-pw").await;
    assert_eq!(created["username"], "dave");
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());
    assert!(created["registeredAt"].is_string());

    let response = send(
        &app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "username": "dave", "password": "other", "name": "Dave 2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "username": "erin", "password": "pw" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app();
    register(&app, "frank", "frank-pw").await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": "frank", "password": "nope" })),
    )
    .await;
    let unknown_user = send(
        &app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": "nobody", "password": "frank-pw" })),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(wrong_password).await, json_body(unknown_user).await);

    let missing = send(
        &app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": "frank" })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}
