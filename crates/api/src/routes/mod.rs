//! Route registration.

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub mod health;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/images/generate", post(handlers::generate::generate_image))
}
