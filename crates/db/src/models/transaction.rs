//! Transaction audit records.
//!
//! Transactions are append-only facts: created once, never mutated or
//! deleted. Balance history must be reconstructible from the signed
//! deltas in this log.

use easel_core::types::{Credits, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Maximum stored prompt excerpt length, in characters.
pub const PROMPT_EXCERPT_MAX: usize = 200;
/// Maximum stored error message length, in characters.
pub const ERROR_MESSAGE_MAX: usize = 500;

/// Truncate to at most `max` characters, respecting char boundaries.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// An immutable transaction row from the `transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    pub operation: String,
    pub model: String,
    /// 0 for failed attempts.
    pub credits_used: Credits,
    /// Balance snapshot after this transaction (unchanged for failures).
    pub credits_remaining: Credits,
    pub success: bool,
    /// Present only for failures, truncated to [`ERROR_MESSAGE_MAX`].
    pub error_message: Option<String>,
    /// Audit excerpt of the originating prompt, truncated to
    /// [`PROMPT_EXCERPT_MAX`].
    pub prompt_excerpt: String,
    pub requested_count: i32,
    pub actual_count: i32,
    pub created_at: Timestamp,
}

/// Input for appending a transaction. Excerpt and error message are
/// truncated by the constructor helpers, not by callers.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub user_id: DbId,
    pub operation: String,
    pub model: String,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub success: bool,
    pub error_message: Option<String>,
    pub prompt_excerpt: String,
    pub requested_count: i32,
    pub actual_count: i32,
}

impl CreateTransaction {
    /// A successful generation: `credits_used` is the actually-charged
    /// amount, `credits_remaining` the post-debit balance.
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        user_id: DbId,
        operation: &str,
        model: &str,
        credits_used: Credits,
        credits_remaining: Credits,
        prompt: &str,
        requested_count: u32,
        actual_count: u32,
    ) -> Self {
        Self {
            user_id,
            operation: operation.to_string(),
            model: model.to_string(),
            credits_used,
            credits_remaining,
            success: true,
            error_message: None,
            prompt_excerpt: truncate(prompt, PROMPT_EXCERPT_MAX),
            requested_count: requested_count as i32,
            actual_count: actual_count as i32,
        }
    }

    /// A failed attempt: zero cost, unchanged balance, truncated error.
    pub fn failure(
        user_id: DbId,
        operation: &str,
        model: &str,
        credits_remaining: Credits,
        prompt: &str,
        requested_count: u32,
        error_message: &str,
    ) -> Self {
        Self {
            user_id,
            operation: operation.to_string(),
            model: model.to_string(),
            credits_used: 0,
            credits_remaining,
            success: false,
            error_message: Some(truncate(error_message, ERROR_MESSAGE_MAX)),
            prompt_excerpt: truncate(prompt, PROMPT_EXCERPT_MAX),
            requested_count: requested_count as i32,
            actual_count: 0,
        }
    }
}
