//! Repository for the `users` table.

use easel_core::types::{Credits, DbId};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token, credits_balance, created_at, last_login_at";

/// Provides operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique-constraint violation (`uq_users_token`) when the
    /// token is already in use.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (token, credits_balance)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.token)
            .bind(input.credits_balance)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by exact token match. At most one row exists per token
    /// (unique index).
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE token = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful token verification by setting `last_login_at`
    /// to now.
    pub async fn touch_last_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Conditionally debit `amount` credits.
    ///
    /// The single conditional UPDATE is the only concurrency-safety
    /// mechanism for billing: two concurrent debits against one user
    /// serialize on the row, and the balance guard makes the loser (or a
    /// request racing a balance change) match zero rows.
    ///
    /// Returns the post-debit balance, or `None` when no row matched --
    /// the caller treats that as a billing conflict.
    pub async fn try_debit(
        pool: &PgPool,
        id: DbId,
        amount: Credits,
    ) -> Result<Option<Credits>, sqlx::Error> {
        let row: Option<(Credits,)> = sqlx::query_as(
            "UPDATE users
             SET credits_balance = credits_balance - $2
             WHERE id = $1 AND credits_balance >= $2
             RETURNING credits_balance",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(balance,)| balance))
    }

    /// Credit `amount` to a user (admin top-up primitive).
    /// Returns the new balance, or `None` if the user does not exist.
    pub async fn add_credits(
        pool: &PgPool,
        id: DbId,
        amount: Credits,
    ) -> Result<Option<Credits>, sqlx::Error> {
        let row: Option<(Credits,)> = sqlx::query_as(
            "UPDATE users
             SET credits_balance = credits_balance + $2
             WHERE id = $1
             RETURNING credits_balance",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(balance,)| balance))
    }
}
