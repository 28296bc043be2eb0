//! The generation orchestrator: authenticate -> validate -> price -> check
//! balance -> compile -> call the generator -> settle -> respond.
//!
//! Every failure after authentication appends a zero-cost failure
//! transaction so operators can reconcile billing questions after the
//! fact. Failures before authentication (missing/invalid token) leave no
//! record.

use axum::extract::State;
use axum::Json;
use easel_core::error::CoreError;
use easel_core::pricing;
use easel_core::prompt::{self, GenerationRequest};
use easel_core::types::Credits;
use easel_db::models::user::User;
use serde::Serialize;

use crate::billing;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response for a completed generation. `actual_count` may be lower than
/// `requested_count` when candidates were filtered; the client detects
/// under-delivery by comparing the two.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub data_urls: Vec<String>,
    pub credits_used: Credits,
    pub remaining_credits: Credits,
    pub requested_count: u32,
    pub actual_count: u32,
}

/// POST /api/v1/images/generate
pub async fn generate_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<GenerationRequest>,
) -> AppResult<Json<GenerateImageResponse>> {
    let user = &auth.user;
    let requested_count = pricing::clamp_candidate_count(request.candidate_count);

    // -- Validate payload --
    if request.prompt.trim().is_empty() {
        let err = CoreError::InvalidInput("Prompt must be a non-empty string".into());
        return Err(reject(&state, user, &request, requested_count, err).await);
    }
    let spec = match pricing::model_spec(&request.model) {
        Ok(spec) => spec,
        Err(err) => return Err(reject(&state, user, &request, requested_count, err).await),
    };

    // -- Price on the REQUESTED count and pre-check the balance --
    let total_cost = match pricing::price_of(&request.model, request.candidate_count) {
        Ok(cost) => cost,
        Err(err) => return Err(reject(&state, user, &request, requested_count, err).await),
    };
    if user.credits_balance < total_cost {
        let err = CoreError::InsufficientCredits {
            required: total_cost,
            available: user.credits_balance,
        };
        return Err(reject(&state, user, &request, requested_count, err).await);
    }

    // -- Compile and call the generator --
    let compiled = prompt::compile(&request, spec);
    let images = match state.genai.generate(&request.model, &compiled).await {
        Ok(images) => images,
        Err(err) => return Err(reject(&state, user, &request, requested_count, err).await),
    };
    let actual_count = images.len() as u32;

    // -- Settle billing on the ACTUAL delivered count --
    let (credits_used, remaining) = match billing::settle_success(
        &state.pool,
        user.id,
        request.operation,
        &request.model,
        requested_count,
        actual_count,
        &request.prompt,
    )
    .await
    {
        Ok(settlement) => (settlement.credits_used, settlement.remaining),
        Err(err @ CoreError::BillingConflict(_)) => {
            // The upstream compute is already spent; withholding the images
            // would make the user pay twice. Return them uncharged, leave a
            // loud log line plus an audit row for the operator.
            tracing::error!(
                user_id = user.id,
                model = %request.model,
                actual_count,
                error = %err,
                "Billing conflict after successful generation; returning images uncharged"
            );
            billing::record_failure(
                &state.pool,
                user.id,
                request.operation,
                &request.model,
                user.credits_balance,
                &request.prompt,
                requested_count,
                &err,
            )
            .await;
            (0, user.credits_balance)
        }
        Err(err) => return Err(AppError::Core(err)),
    };

    Ok(Json(GenerateImageResponse {
        data_urls: images.into_iter().map(|i| i.data_url).collect(),
        credits_used,
        remaining_credits: remaining,
        requested_count,
        actual_count,
    }))
}

/// Record a failure transaction for an authenticated request, then wrap
/// the error for the response.
async fn reject(
    state: &AppState,
    user: &User,
    request: &GenerationRequest,
    requested_count: u32,
    err: CoreError,
) -> AppError {
    billing::record_failure(
        &state.pool,
        user.id,
        request.operation,
        &request.model,
        user.credits_balance,
        &request.prompt,
        requested_count,
        &err,
    )
    .await;
    AppError::Core(err)
}
