use std::sync::Arc;
use std::time::Instant;

use easel_genai::GenAiClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: easel_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream generation API client.
    pub genai: GenAiClient,
    /// Process start instant, for uptime reporting.
    pub started_at: Instant,
}
