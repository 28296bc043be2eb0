//! User entity model and DTOs.

use easel_core::types::{Credits, DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// The token is the bearer credential itself -- NEVER serialize this row
/// to API responses directly; handlers build their own response DTOs.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub token: String,
    pub credits_balance: Credits,
    pub created_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// DTO for provisioning a new user (out-of-band admin operation; no HTTP
/// endpoint exposes this).
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub token: String,
    pub credits_balance: Credits,
}
