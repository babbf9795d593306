//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order from a validated config
//! - Start the metrics exporter
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ResponderConfig;
use crate::http::HttpServer;
use crate::issuance::{self, IssuanceError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics::{self, PrometheusFilterMetrics};
use crate::responder::{FilterBuildError, FilterSource, InMemorySource, Source};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("loading issuer certificates: {0}")]
    Issuers(#[from] IssuanceError),

    #[error("loading responses from {path}: {source}")]
    Responses {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("building filter: {0}")]
    Filter(#[from] FilterBuildError),

    #[error("binding {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serving: {0}")]
    Serve(#[source] std::io::Error),
}

/// Issuers, then the in-memory store, then the filter in front of it.
pub fn build_source(config: &ResponderConfig) -> Result<Arc<dyn Source>, StartupError> {
    let issuers = issuance::load_issuers(&config.filter.issuer_certs)?;

    let path = &config.source.responses_file;
    let memory = InMemorySource::from_file(path).map_err(|source| StartupError::Responses {
        path: path.clone(),
        source,
    })?;
    if memory.is_empty() {
        tracing::warn!(path = %path.display(), "No OCSP responses loaded; every request will be unauthorized");
    }

    let filter = FilterSource::new(
        &issuers,
        config.filter.serial_prefixes.clone(),
        Arc::new(memory),
        Arc::new(PrometheusFilterMetrics),
    )?;

    tracing::info!(
        issuers = filter.issuer_count(),
        serial_prefixes = ?config.filter.serial_prefixes,
        "Filter source ready"
    );
    Ok(Arc::new(filter))
}

/// Run the responder until SIGINT/SIGTERM.
///
/// Logging must already be initialized.
pub async fn run(config: ResponderConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let source = build_source(&config)?;

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, source);

    let serve = server.run(listener, &shutdown);
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result.map_err(StartupError::Serve),
        _ = signals::wait_for_signal() => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    }

    serve.await.map_err(StartupError::Serve)?;
    tracing::info!("Shutdown complete");
    Ok(())
}
