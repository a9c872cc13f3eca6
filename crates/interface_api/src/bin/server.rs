//! Health Quote API - Server Binary
//!
//! Starts the quote session API with HTTP adapters for the quote backend
//! and the plan catalog.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin quote-api
//!
//! # Run with environment variables
//! QUOTE_API_PORT=9000 QUOTE_API_CATALOG_BASE_URL=http://localhost:3000 cargo run --bin quote-api
//! ```
//!
//! # Environment Variables
//!
//! * `QUOTE_API_HOST` - Server host (default: 0.0.0.0)
//! * `QUOTE_API_PORT` - Server port (default: 8080)
//! * `QUOTE_API_LOG_LEVEL` - Log level or filter directive (default: info; `RUST_LOG` wins)
//! * `QUOTE_API_LOG_JSON` - Emit JSON log lines (default: false)
//! * `QUOTE_API_QUOTE_ENDPOINT` - URL quotes are POSTed to
//! * `QUOTE_API_CATALOG_BASE_URL` - Plan catalog API root
//! * `QUOTE_API_TIMEOUT_SECS` - Outbound request timeout (default: 30)
//! * `QUOTE_API_CATALOG_RETRY_ATTEMPTS` - Catalog read retries (default: 3)
//! * `QUOTE_API_SESSION_TTL_SECS` - Idle time before a session is evicted (default: 1800)
//! * `QUOTE_API_SESSION_SWEEP_INTERVAL_SECS` - Idle session sweep period (default: 60)
//! * `QUOTE_API_CIRCUIT_BREAKER__FAILURE_THRESHOLD` and friends - breaker tuning

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_http::{HttpPlanCatalog, HttpQuoteSubmitter};
use interface_api::{config::ApiConfig, create_router, sessions::SessionStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid QUOTE_API configuration")?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        quote_endpoint = %config.quote_endpoint,
        catalog_base_url = %config.catalog_base_url,
        "Starting Health Quote API Server"
    );

    let submitter = HttpQuoteSubmitter::new(config.submitter_config())
        .context("Failed to create quote submitter")?;
    let catalog = HttpPlanCatalog::new(config.catalog_config())
        .context("Failed to create plan catalog client")?;

    let state = AppState::new(config.clone(), Arc::new(submitter), Arc::new(catalog));
    let sweeper = tokio::spawn(sweep_idle_sessions(
        Arc::clone(&state.sessions),
        config.session_sweep_interval(),
    ));
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Periodically evicts quote sessions that outlived the idle TTL
async fn sweep_idle_sessions(sessions: Arc<SessionStore>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sessions.evict_idle().await;
    }
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
