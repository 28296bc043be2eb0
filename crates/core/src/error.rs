//! Closed error taxonomy for the generation proxy.
//!
//! Every failure mode a request can hit is a variant here, carrying a
//! discriminant the API layer maps to an HTTP status via a total match.
//! Downstream code must never classify failures by inspecting message text.

use crate::types::Credits;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A caller-supplied field is missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The presented bearer token matched no user.
    #[error("Unknown token")]
    TokenNotFound,

    /// Authentication is required or the credential was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requested model is not in the price table.
    #[error("Unknown model '{model}'. Valid models: {}", valid.join(", "))]
    InvalidModel {
        model: String,
        valid: Vec<&'static str>,
    },

    /// The user's balance cannot cover the priced request.
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits {
        required: Credits,
        available: Credits,
    },

    /// The upstream generation API returned a failure.
    #[error("Image generation failed: {0}")]
    Upstream(String),

    /// The upstream API rejected the request on safety grounds.
    #[error("Content rejected by safety filters: {0}")]
    ContentRejected(String),

    /// The upstream API succeeded but returned zero candidates.
    #[error("No images were generated")]
    NoCandidates,

    /// Candidates were returned but none contained a usable image.
    #[error("No valid images in the generation response")]
    NoValidImages,

    /// The upstream call exceeded its wall-clock budget.
    #[error("Image generation timed out after {0} seconds")]
    Timeout(u64),

    /// The conditional balance debit matched zero rows: the balance changed
    /// (or the user vanished) between the pre-check and the debit.
    #[error("Billing conflict: {0}")]
    BillingConflict(String),

    /// The document store is unreachable after bounded retries.
    #[error("Store connectivity error: {0}")]
    Connectivity(String),

    /// Anything else. Details are logged, not surfaced.
    #[error("Internal error: {0}")]
    Internal(String),
}
