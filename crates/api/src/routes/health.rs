use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use easel_db::repositories::TransactionRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Seconds since process start.
    pub uptime_secs: u64,
}

/// Diagnostic probe response: store connectivity plus an aggregate count.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbProbeResponse {
    pub db_healthy: bool,
    pub transactions_recorded: i64,
}

/// GET /health -- liveness plus database reachability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = easel_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /health/db -- diagnostic store probe. Unlike `/health`, this fails
/// with a 500-class response when the store is down, so external monitors
/// can alert on it directly.
async fn db_probe(State(state): State<AppState>) -> AppResult<Json<DbProbeResponse>> {
    easel_db::health_check(&state.pool).await?;
    let transactions_recorded = TransactionRepo::count_all(&state.pool).await?;

    Ok(Json(DbProbeResponse {
        db_healthy: true,
        transactions_recorded,
    }))
}

/// Mount health routes (root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_probe))
}
