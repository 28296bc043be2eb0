use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easel_api::config::ServerConfig;
use easel_api::router::build_app_router;
use easel_api::shutdown::serve_until_drained;
use easel_api::state::AppState;
use easel_genai::GenAiClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = easel_db::connect_with_retry(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    easel_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Heartbeat ---
    let heartbeat_cancel = tokio_util::sync::CancellationToken::new();
    let heartbeat = easel_db::Heartbeat::new(pool.clone());
    let heartbeat_cancel_clone = heartbeat_cancel.clone();
    let heartbeat_handle = tokio::spawn(async move {
        heartbeat.run(heartbeat_cancel_clone).await;
    });
    tracing::info!("Database heartbeat started");

    // --- Generation client ---
    let genai = GenAiClient::new(config.genai.clone());

    // --- App state & router ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        genai,
        started_at: Instant::now(),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Signal watcher: flips the token so both the graceful-shutdown hook
    // and the drain bound observe the same instant.
    let shutdown = tokio_util::sync::CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.cancel();
        });
    }

    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move { shutdown.cancelled().await }
    });

    let drained = serve_until_drained(
        server.into_future(),
        shutdown.clone(),
        Duration::from_secs(config.shutdown_timeout_secs),
    )
    .await
    .expect("Server error");

    // --- Post-shutdown cleanup ---
    if drained {
        tracing::info!("Server stopped accepting connections, cleaning up");
    } else {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Shutdown drain period elapsed with connections still open, aborting them"
        );
    }

    heartbeat_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), heartbeat_handle).await;
    tracing::info!("Database heartbeat stopped");

    pool.close().await;
    tracing::info!("Database pool closed, graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
