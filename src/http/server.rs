//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the OCSP handlers
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener
//! - Dispatch decoded requests to the response source
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ResponderConfig;
use crate::http::request::{self, RequestError};
use crate::http::response::{self, Outcome};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::ocsp::OcspRequest;
use crate::responder::Source;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn Source>,
}

/// HTTP front end for a response source.
pub struct HttpServer {
    router: Router,
    config: ResponderConfig,
}

impl HttpServer {
    /// Create a new HTTP server answering from `source`.
    pub fn new(config: ResponderConfig, source: Arc<dyn Source>) -> Self {
        let state = AppState { source };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ResponderConfig, state: AppState) -> Router {
        Router::new()
            .route("/", post(post_handler))
            .route("/{*encoded}", get(get_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.http.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        let mut rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn post_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let decoded = request::decode_post(&body);
    respond(&state, "POST", &headers, decoded, start).await
}

async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    encoded: Result<Path<String>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let decoded = match encoded {
        Ok(Path(encoded)) => request::decode_get(&encoded),
        Err(rejection) => Err(RequestError::Path(rejection.body_text())),
    };
    respond(&state, "GET", &headers, decoded, start).await
}

async fn respond(
    state: &AppState,
    method: &'static str,
    headers: &HeaderMap,
    decoded: Result<OcspRequest, RequestError>,
    start: Instant,
) -> Response {
    let request_id = request::request_id(headers);

    let ocsp_request = match decoded {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Malformed OCSP request");
            metrics::record_request(method, Outcome::Malformed.as_label(), start);
            return response::malformed();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        serial = %ocsp_request.serial().to_canonical_string(),
        issuer_key_hash = %hex::encode(ocsp_request.issuer_key_hash()),
        "OCSP request"
    );

    let (outcome, res) = match state.source.response(&ocsp_request).await {
        Ok(found) => (Outcome::Success, response::success(&found, SystemTime::now())),
        Err(e) => {
            if e.is_not_found() {
                tracing::debug!(request_id = %request_id, error = %e, "No response found");
            } else {
                tracing::error!(request_id = %request_id, error = %e, "Error retrieving OCSP response");
            }
            response::from_source_error(&e)
        }
    };

    metrics::record_request(method, outcome.as_label(), start);
    res
}
