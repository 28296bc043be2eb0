//! Repository for the `transactions` table (append-only audit log).
//!
//! Deliberately exposes no update or delete operations.

use easel_core::types::DbId;
use sqlx::PgPool;

use crate::models::transaction::{CreateTransaction, Transaction};

/// Column list for transactions queries.
const COLUMNS: &str = "id, user_id, operation, model, credits_used, credits_remaining, \
    success, error_message, prompt_excerpt, requested_count, actual_count, created_at";

/// Append and read operations for transaction records.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Append a transaction, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions
                (user_id, operation, model, credits_used, credits_remaining,
                 success, error_message, prompt_excerpt, requested_count, actual_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.user_id)
            .bind(&input.operation)
            .bind(&input.model)
            .bind(input.credits_used)
            .bind(input.credits_remaining)
            .bind(input.success)
            .bind(&input.error_message)
            .bind(&input.prompt_excerpt)
            .bind(input.requested_count)
            .bind(input.actual_count)
            .fetch_one(pool)
            .await
    }

    /// List a user's transactions, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total number of recorded transactions (diagnostics).
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Number of transactions for one user (used by tests and reconciliation).
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
