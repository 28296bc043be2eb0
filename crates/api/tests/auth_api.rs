//! Integration tests for token verification.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_empty, post_json, post_json_auth, seed_user};
use easel_db::repositories::{TransactionRepo, UserRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_without_token_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_empty(app, "/api/v1/auth/verify").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Pre-auth failures leave no audit record.
    assert_eq!(TransactionRepo::count_all(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_with_empty_bearer_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/auth/verify", "   ", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_unknown_token_returns_404_without_leaking(pool: PgPool) {
    seed_user(&pool, "real-token", 50).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/auth/verify",
        "some-other-token",
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    // Generic message: must not hint at which tokens exist.
    assert_eq!(json["error"], "Unknown token");

    assert_eq!(TransactionRepo::count_all(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_via_header_succeeds_and_touches_last_login(pool: PgPool) {
    let user = seed_user(&pool, "tok-verify", 120).await;
    assert!(user.last_login_at.is_none());

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/verify", "tok-verify", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["userId"], user.id);
    assert_eq!(json["creditsBalance"], 120);

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_accepts_token_in_body(pool: PgPool) {
    let user = seed_user(&pool, "tok-body", 7).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/verify",
        serde_json::json!({ "token": "tok-body" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["userId"], user.id);
    assert_eq!(json["creditsBalance"], 7);
}
