/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Credit amounts are signed 64-bit integers (balances are non-negative,
/// but deltas in reconciliation math are signed).
pub type Credits = i64;
