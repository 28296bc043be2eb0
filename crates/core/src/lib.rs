//! Domain logic for the Easel generation proxy.
//!
//! Pure types and functions only -- no I/O. The error taxonomy, the cost
//! model, the prompt compiler, and the retry combinator live here so that
//! the db/genai/api crates share one vocabulary.

pub mod error;
pub mod pricing;
pub mod prompt;
pub mod retry;
pub mod types;
