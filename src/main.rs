//! Logitrack - a logistics tracker API
//!
//! Serves inventory and order endpoints behind a read-through cache and a
//! fixed-window rate limiter.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logitrack::api::{create_router, AppState};
use logitrack::repository::MemoryRepository;
use logitrack::{spawn_cleanup_task, Config};

/// Main entry point for the Logitrack server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the repository, cache and rate limiter
/// 4. Start background expiry sweep
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logitrack=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Logitrack");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_max_entries={}, cache_ttl={}s, rate_limit={}/{}s, cleanup_interval={}s",
        config.server_port,
        config.cache_max_entries,
        config.cache_ttl,
        config.rate_limit_threshold,
        config.rate_limit_window,
        config.cleanup_interval
    );
    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set, cache admin endpoints are disabled");
    }

    let repository = Arc::new(
        MemoryRepository::with_sample_data()
            .await
            .context("failed to seed the in-memory repository")?,
    );
    let state = AppState::with_repository(&config, repository);
    info!("Cache and rate limiter initialized");

    let cleanup_handle = spawn_cleanup_task(
        state.cache.store().clone(),
        state.limiter.clone(),
        config.cleanup_interval,
    );
    info!("Background expiry sweep started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate limiter's client identification
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Expiry sweep aborted");
}
