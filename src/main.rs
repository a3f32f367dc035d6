//! # PFI Exchange Service
//!
//! Reconciliation daemon entry point: loads configuration, wires the
//! in-memory stores, HTTP gateway, and identity provider, then runs
//! the reconciler loop until the process receives SIGINT or SIGTERM.

use std::sync::Arc;

use pfi_exchange::application::{Reconciler, ReconcilerConfig};
use pfi_exchange::config::{AppConfig, LogConfig, LogFormat};
use pfi_exchange::domain::value_objects::{CustomerId, PfiId};
use pfi_exchange::infrastructure::gateway::HttpMessageGateway;
use pfi_exchange::infrastructure::identity::{
    HmacSigner, SigningCredentials, StaticIdentityProvider,
};
use pfi_exchange::infrastructure::persistence::{InMemoryExchangeStore, InMemoryQuoteStore};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_logging(&config.log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.service.environment,
        "starting pfi exchange service"
    );

    let signing_key = match std::env::var("PFI_EXCHANGE_SIGNING_KEY") {
        Ok(key) => key,
        Err(_) if config.service.environment == "development" => {
            warn!("PFI_EXCHANGE_SIGNING_KEY not set, using development key");
            "pfi-exchange-development-key".to_string()
        }
        Err(_) => anyhow::bail!("PFI_EXCHANGE_SIGNING_KEY must be set outside development"),
    };

    let exchanges = Arc::new(InMemoryExchangeStore::new());
    let quotes = Arc::new(InMemoryQuoteStore::new());

    let mut gateway = HttpMessageGateway::new(
        config.gateway.base_url.as_str(),
        config.gateway.request_timeout_ms,
    )?;
    for (pfi_id, base_url) in &config.gateway.endpoints {
        gateway = gateway.with_endpoint(PfiId::from(pfi_id.as_str()), base_url.as_str());
    }
    let gateway = Arc::new(gateway);

    let credentials = SigningCredentials::new(
        config.identity.subject.as_str(),
        config.identity.key_id.as_str(),
        Arc::new(HmacSigner::new(signing_key.as_bytes())),
    );
    let identity = Arc::new(
        StaticIdentityProvider::new()
            .with_credentials(CustomerId::from(config.identity.subject.as_str()), credentials),
    );

    let reconciler = Reconciler::new(
        exchanges,
        quotes,
        gateway,
        identity,
        ReconcilerConfig {
            poll_interval_secs: config.reconciler.poll_interval_secs,
            max_concurrent_fetches: config.reconciler.max_concurrent_fetches,
        },
    );
    reconciler.start();
    info!(
        poll_interval_secs = config.reconciler.poll_interval_secs,
        "reconciler started"
    );

    shutdown_signal().await;
    info!("shutdown signal received");

    reconciler.stop();
    info!("shutdown complete");

    Ok(())
}

/// Initializes the tracing subscriber from the logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level when set.
fn init_logging(config: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(config.include_target)
                .json()
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(config.include_target)
                .pretty()
                .init();
        }
    }
}

/// Resolves when the process receives SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
