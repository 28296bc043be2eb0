//! Bearer-token authentication extractor.
//!
//! A token is a permanent opaque credential: no password, no expiry, no
//! rotation. Verification resolves it to a full user row (including the
//! current balance) so handlers never re-fetch the user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use easel_core::error::CoreError;
use easel_db::models::user::User;
use easel_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a bearer token in the `Authorization`
/// header.
///
/// Use as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The resolved user row, with the balance as of authentication time.
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let user = UserRepo::find_by_token(&state.pool, token)
            .await
            .map_err(AppError::Database)?
            // Same message as a malformed credential: the response must not
            // leak whether other tokens exist.
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid token".into())))?;

        // Best-effort: a failed last-login update must not fail the request.
        if let Err(e) = UserRepo::touch_last_login(&state.pool, user.id).await {
            tracing::warn!(user_id = user.id, error = %e, "Failed to update last login");
        }

        Ok(AuthUser { user })
    }
}

/// Pull the bearer token out of the `Authorization` header.
///
/// Missing header -> 401; malformed scheme or empty token -> 400.
pub fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidInput(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?
        .trim();

    if token.is_empty() {
        return Err(AppError::Core(CoreError::InvalidInput(
            "Token must be a non-empty string".into(),
        )));
    }

    Ok(token)
}
