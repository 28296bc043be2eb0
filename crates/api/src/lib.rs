//! Easel API server library.
//!
//! Exposes the building blocks (config, state, error handling, billing,
//! routes) so integration tests and the binary entrypoint share the same
//! router and middleware stack.

pub mod billing;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod shutdown;
pub mod state;
