//! Application-level error type and the error -> HTTP status mapping.
//!
//! The mapping over [`CoreError`] is a total match on the closed taxonomy;
//! no status is ever chosen by inspecting message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use easel_core::error::CoreError;
use serde_json::json;

/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `easel-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Total mapping from the domain taxonomy to HTTP status + error code.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_INPUT", core.to_string())
        }
        CoreError::TokenNotFound => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
        }
        CoreError::Unauthorized(_) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", core.to_string())
        }
        CoreError::InvalidModel { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_MODEL", core.to_string())
        }
        CoreError::InsufficientCredits { .. } => (
            StatusCode::BAD_REQUEST,
            "INSUFFICIENT_CREDITS",
            core.to_string(),
        ),
        CoreError::ContentRejected(_) => (
            StatusCode::BAD_REQUEST,
            "CONTENT_REJECTED",
            core.to_string(),
        ),
        CoreError::NoCandidates => {
            (StatusCode::BAD_REQUEST, "NO_CANDIDATES", core.to_string())
        }
        CoreError::NoValidImages => {
            (StatusCode::BAD_REQUEST, "NO_VALID_IMAGES", core.to_string())
        }
        CoreError::Upstream(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "UPSTREAM_ERROR",
            core.to_string(),
        ),
        CoreError::Timeout(_) => {
            (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", core.to_string())
        }
        CoreError::Connectivity(msg) => {
            tracing::error!(error = %msg, "Store connectivity error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Service temporarily unavailable".to_string(),
            )
        }
        // Paid-for upstream work with unresolved billing: log loudly so
        // the operator can reconcile from the transaction log.
        CoreError::BillingConflict(msg) => {
            tracing::error!(error = %msg, "BILLING CONFLICT -- manual reconciliation required");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "BILLING_CONFLICT",
                "A billing error occurred".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
