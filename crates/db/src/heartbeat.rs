//! Periodic database liveness probe.
//!
//! Runs independently of request handling and never blocks it. A failed
//! ping is logged and retried on the next tick; the pool re-establishes
//! broken connections on its own, so the heartbeat's job is visibility,
//! not repair.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{health_check, DbPool};

/// Interval between liveness probes.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Background service that pings the store on a fixed interval.
pub struct Heartbeat {
    pool: DbPool,
}

impl Heartbeat {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the heartbeat loop until `cancel` fires.
    ///
    /// Logs a state transition on the first failure after a healthy run
    /// and on recovery, rather than spamming every tick.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        // Consume the immediate first tick so the probe starts one
        // interval after boot (startup already health-checked).
        interval.tick().await;

        let mut healthy = true;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Database heartbeat cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match health_check(&self.pool).await {
                        Ok(()) => {
                            if !healthy {
                                tracing::info!("Database heartbeat recovered");
                                healthy = true;
                            }
                        }
                        Err(e) => {
                            if healthy {
                                tracing::error!(error = %e, "Database heartbeat failed");
                                healthy = false;
                            } else {
                                tracing::warn!(error = %e, "Database still unreachable");
                            }
                        }
                    }
                }
            }
        }
    }
}
