//! Handler for token verification.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use easel_core::error::CoreError;
use easel_core::types::{Credits, DbId};
use easel_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Optional request body for `POST /auth/verify`. The token may come from
/// the `Authorization` header instead; the header wins when both are set.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Response for a successfully verified token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user_id: DbId,
    pub credits_balance: Credits,
}

/// POST /api/v1/auth/verify
///
/// Resolves a bearer token to its user. Missing or empty token -> 400;
/// well-formed but unmatched -> 404 (this endpoint exists so the plugin
/// can distinguish a revoked credential from a malformed one).
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<VerifyRequest>>,
) -> AppResult<Json<VerifyResponse>> {
    let header_token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let body_token = body.as_ref().and_then(|b| b.token.as_deref());

    let token = header_token
        .or(body_token)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidInput(
                "Token must be a non-empty string".into(),
            ))
        })?;

    let user = UserRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or(AppError::Core(CoreError::TokenNotFound))?;

    // Best-effort: verification succeeds even if the timestamp write fails.
    if let Err(e) = UserRepo::touch_last_login(&state.pool, user.id).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to update last login");
    }

    Ok(Json(VerifyResponse {
        user_id: user.id,
        credits_balance: user.credits_balance,
    }))
}
