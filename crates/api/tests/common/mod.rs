//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router with the production middleware stack
//! and drives it via `tower::ServiceExt::oneshot`, without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use softdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use softdesk_api::auth::password::hash_password;
use softdesk_api::config::ServerConfig;
use softdesk_api::routes;
use softdesk_api::state::AppState;
use softdesk_db::models::user::{NewUser, User};
use softdesk_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn with_bearer(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = with_bearer(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json"),
        token,
    )
    .body(Body::from(body.to_string()))
    .expect("request should build");
    send(app, request).await
}

async fn send_empty(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> Response<Body> {
    let request = with_bearer(Request::builder().method(method).uri(uri), token)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send_empty(app, Method::GET, uri, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send_empty(app, Method::GET, uri, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, Some(token), body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PATCH, uri, Some(token), body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send_empty(app, Method::DELETE, uri, Some(token)).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Plaintext password shared by all seeded users.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Create a user directly in the database and return the row plus a valid
/// access token signed with the test secret.
pub async fn seed_user(pool: &PgPool, username: &str, is_staff: bool) -> (User, String) {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let birth_date = chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let input = NewUser::new(
        username.to_string(),
        format!("{username}@test.com"),
        hashed,
        String::new(),
        String::new(),
        is_staff,
        birth_date,
        false,
        false,
    )
    .expect("seed user input should validate");

    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");

    let token = generate_access_token(user.id, is_staff, &test_config().jwt)
        .expect("token generation should succeed");

    (user, token)
}

/// Create a project via the API and return its id.
pub async fn seed_project(pool: &PgPool, token: &str, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects",
        token,
        serde_json::json!({ "name": name, "project_type": "BACK_END" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().expect("project id should be a number")
}

/// Add an existing user as contributor via the API (as `owner_token`).
pub async fn seed_contributor(pool: &PgPool, owner_token: &str, project_id: i64, username: &str) {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/contributors"),
        owner_token,
        serde_json::json!({ "username": username }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Create an issue via the API and return its id.
pub async fn seed_issue(pool: &PgPool, token: &str, project_id: i64, title: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/issues"),
        token,
        serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().expect("issue id should be a number")
}
