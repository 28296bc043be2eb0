//! Billing settlement and failure recording.
//!
//! Billing charges for images actually delivered, not images requested.
//! The conditional debit in `UserRepo::try_debit` is the sole concurrency
//! mechanism; there are no in-process locks.

use easel_core::error::CoreError;
use easel_core::pricing;
use easel_core::prompt::Operation;
use easel_core::types::{Credits, DbId};
use easel_db::models::transaction::CreateTransaction;
use easel_db::repositories::{TransactionRepo, UserRepo};
use easel_db::DbPool;

/// Outcome of a successful settlement.
#[derive(Debug, Clone, Copy)]
pub struct Settlement {
    /// Credits actually charged (per-image price x delivered count).
    pub credits_used: Credits,
    /// Post-debit balance.
    pub remaining: Credits,
}

/// Debit the user for `actual_count` delivered images and append the
/// success transaction.
///
/// A zero-row debit means the balance changed (or the user vanished)
/// between the pre-check and the debit; that surfaces as
/// [`CoreError::BillingConflict`] and the caller decides how to respond
/// (the orchestrator still returns the images -- the upstream compute is
/// already spent).
#[allow(clippy::too_many_arguments)]
pub async fn settle_success(
    pool: &DbPool,
    user_id: DbId,
    operation: Operation,
    model: &str,
    requested_count: u32,
    actual_count: u32,
    prompt: &str,
) -> Result<Settlement, CoreError> {
    let credits_used = pricing::cost_for_delivered(model, actual_count as usize)?;

    let remaining = UserRepo::try_debit(pool, user_id, credits_used)
        .await
        .map_err(|e| CoreError::Internal(format!("Debit query failed: {e}")))?
        .ok_or_else(|| {
            CoreError::BillingConflict(format!(
                "Conditional debit of {credits_used} credits matched no row for user {user_id}"
            ))
        })?;

    let record = CreateTransaction::success(
        user_id,
        operation.as_str(),
        model,
        credits_used,
        remaining,
        prompt,
        requested_count,
        actual_count,
    );
    TransactionRepo::create(pool, &record).await.map_err(|e| {
        // The debit landed but the audit row did not. The balance is
        // correct; the log entry lets the operator backfill the record.
        tracing::error!(
            user_id,
            credits_used,
            remaining,
            error = %e,
            "Debited balance but failed to append success transaction"
        );
        CoreError::Internal(format!("Failed to record transaction: {e}"))
    })?;

    tracing::info!(
        user_id,
        model,
        operation = operation.as_str(),
        credits_used,
        remaining,
        requested_count,
        actual_count,
        "Generation settled"
    );

    Ok(Settlement {
        credits_used,
        remaining,
    })
}

/// Append a zero-cost failure transaction. Best-effort: only callable once
/// a user context exists, and its own failure is logged, never propagated
/// (the original error is what the client must see).
pub async fn record_failure(
    pool: &DbPool,
    user_id: DbId,
    operation: Operation,
    model: &str,
    credits_remaining: Credits,
    prompt: &str,
    requested_count: u32,
    error: &CoreError,
) {
    let record = CreateTransaction::failure(
        user_id,
        operation.as_str(),
        model,
        credits_remaining,
        prompt,
        requested_count,
        &error.to_string(),
    );

    if let Err(e) = TransactionRepo::create(pool, &record).await {
        tracing::error!(
            user_id,
            model,
            error = %e,
            original_error = %error,
            "Failed to append failure transaction"
        );
    }
}
