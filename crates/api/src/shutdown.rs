//! Bounded graceful shutdown.
//!
//! Once the termination signal fires, in-flight requests get a fixed drain
//! period; a stalled connection must not keep the process alive forever.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Drive `server` to completion. After `cancel` fires, wait at most `drain`
/// for the server future to finish; past that the future is dropped,
/// aborting whatever connections remain.
///
/// Returns `Ok(true)` when the server completed on its own, `Ok(false)`
/// when the drain bound was hit.
pub async fn serve_until_drained<F, E>(
    server: F,
    cancel: CancellationToken,
    drain: Duration,
) -> Result<bool, E>
where
    F: Future<Output = Result<(), E>>,
{
    let mut server = std::pin::pin!(server);

    tokio::select! {
        result = &mut server => result.map(|()| true),
        () = async {
            cancel.cancelled().await;
            tokio::time::sleep(drain).await;
        } => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_completion_reports_drained() {
        let cancel = CancellationToken::new();
        let server = std::future::ready(Ok::<(), std::io::Error>(()));

        let drained = serve_until_drained(server, cancel, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(drained);
    }

    #[tokio::test]
    async fn stalled_server_is_dropped_after_drain_period() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let server = std::future::pending::<Result<(), std::io::Error>>();

        let drained = serve_until_drained(server, cancel, Duration::from_millis(20))
            .await
            .unwrap();
        assert!(!drained);
    }

    #[tokio::test]
    async fn drain_period_does_not_start_before_cancellation() {
        let cancel = CancellationToken::new();
        let server = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<(), std::io::Error>(())
        };

        // Drain bound shorter than the server's runtime, but the token never
        // fires, so the server must still complete cleanly.
        let drained = serve_until_drained(server, cancel, Duration::from_millis(1))
            .await
            .unwrap();
        assert!(drained);
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let cancel = CancellationToken::new();
        let server = std::future::ready(Err::<(), _>(std::io::Error::other("bind lost")));

        let err = serve_until_drained(server, cancel, Duration::from_secs(60))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "bind lost");
    }
}
