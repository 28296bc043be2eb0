//! Shared helpers for API integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so
//! integration tests exercise the same middleware stack (CORS, request ID,
//! timeout, body limit, panic recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use easel_api::config::ServerConfig;
use easel_api::router::build_app_router;
use easel_api::state::AppState;
use easel_db::models::user::{CreateUser, User};
use easel_db::repositories::UserRepo;
use easel_genai::{GenAiClient, GenAiConfig};

/// Build a test `ServerConfig` pointing the generation client at
/// `genai_url` (use an unroutable address for tests that must never reach
/// upstream).
pub fn test_config(genai_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        body_limit_mb: 50,
        genai: GenAiConfig {
            api_url: genai_url.to_string(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        },
    }
}

/// Build the full application router against an upstream that refuses
/// connections (for tests that never reach generation).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_upstream(pool, "http://127.0.0.1:9")
}

/// Build the full application router against a specific upstream URL
/// (usually one spawned by [`spawn_upstream`]).
pub fn build_test_app_with_upstream(pool: PgPool, genai_url: &str) -> Router {
    let config = test_config(genai_url);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        genai: GenAiClient::new(config.genai.clone()),
        started_at: Instant::now(),
    };
    build_app_router(state, &config)
}

/// Spawn a canned stand-in for the generation API on an ephemeral port.
/// Every request gets `status` + `body`. Returns the base URL.
pub async fn spawn_upstream(status: StatusCode, body: serde_json::Value) -> String {
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, axum::Json(body)) }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream");
    });

    format!("http://{addr}")
}

/// Create a user directly in the database.
pub async fn seed_user(pool: &PgPool, token: &str, balance: i64) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            token: token.to_string(),
            credits_balance: balance,
        },
    )
    .await
    .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST without a body (exercises missing-payload handling).
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}
