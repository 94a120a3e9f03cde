#![doc = include_str!("../README.md")]

mod server;

use axum::Router;
use clap::Parser;
use server::config::{CliArgs, ServerConfig};
use server::service::{handler::router, state::AppState};
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    let addr = config.server_addr.clone();
    let uds = config.uds;
    let state = AppState::new(config);
    let app = router(state.clone());

    let res = if uds {
        #[cfg(unix)]
        {
            let listener = tokio::net::UnixListener::bind(&addr)?;
            log_startup_info(&addr, state.config());
            let res = serve(listener, app, state).await;
            // Best effort: a panic can still leave the socket file behind.
            let _ = std::fs::remove_file(&addr);
            res
        }
        #[cfg(not(unix))]
        {
            anyhow::bail!("Unix domain sockets are not supported on this platform");
        }
    } else {
        let listener = TcpListener::bind(&addr).await?;
        log_startup_info(&addr, state.config());
        serve(listener, app, state).await
    };

    providers.shutdown();
    res
}

/// Serves `app` until a shutdown signal arrives, then drains in-flight
/// streams for up to the configured timeout.
///
/// Once the signal fires, health checks report unavailable and new streams
/// are refused. If sessions are still running when the timeout expires the
/// server stops anyway and their connections are dropped.
async fn serve<L>(listener: L, app: Router, state: AppState) -> anyhow::Result<()>
where
    L: axum::serve::Listener,
    L::Addr: core::fmt::Debug,
{
    let token = state.shutdown_token();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(token.clone()))
        .into_future();

    let drain = async {
        token.cancelled().await;
        if state.drain(state.config().shutdown_timeout).await {
            // Let the server close the remaining connections itself.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        res = server => res?,
        () = drain => {
            tracing::warn!("Forcing shutdown with {} streams in flight", state.inflight());
        }
    }

    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(addr: &str, config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting numstream service on {} with full config: {:#?}",
            addr,
            config
        );
    } else {
        tracing::info!(
            "Starting numstream service on {} ({} records per download, flush every {})",
            addr,
            config.record_count,
            config.download.flush_every
        );
    }
}

async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");

    // Flip health to unavailable and stop accepting new streams.
    token.cancel();
}
