//! nostr-restore server binary.
//!
//! Reads configuration from the environment (optionally via a `.env` file),
//! then serves npub lookups until Ctrl+C or SIGTERM.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nostr_restore::{AppState, Config, service};

/// Look up archived Nostr events by npub and restore lost contact lists.
#[derive(Parser, Debug)]
#[command(name = "nostr-restore", version)]
#[command(about = "Archived Nostr event lookup and restore server", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Environment from .env is applied before the subscriber reads RUST_LOG.
    let dotenv_loaded = std::path::Path::new(&args.dotenv).exists();
    if dotenv_loaded {
        dotenvy::from_path(&args.dotenv)?;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv_loaded {
        tracing::info!(path = %args.dotenv, "loaded environment file");
    }

    // Profile relays are wss://, which needs a process-wide rustls provider.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        archive_table = %state.config.archive_table,
        profile_relays = ?state.config.profile_relays,
        restore_relays = ?state.config.restore_relays,
        "nostr-restore starting"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening for lookups");

    axum::serve(listener, service(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("nostr-restore stopped");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
