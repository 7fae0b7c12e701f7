//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Dispatch requests to the mount that owns their path
//! - Apply hot-reloaded configuration between requests
//! - Serve over plain TCP or TLS with graceful shutdown

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde::Serialize;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
use crate::http::response::json_error;
use crate::lifecycle::startup;
use crate::observability::{metrics, spans};
use crate::proxy::{auth, passthrough};
use crate::routing::Mount;
use crate::session::{self, SessionCookies};
use crate::upstream::UpstreamClient;

/// Errors constructing the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live configuration; swapped on reload.
    pub config: Arc<ArcSwap<ProxyConfig>>,
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    live: Arc<ArcSwap<ProxyConfig>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::new(&config.timeouts)?;
        let live = Arc::new(ArcSwap::from_pointee(config.clone()));

        let state = AppState {
            config: live.clone(),
            upstream,
        };

        Ok(Self {
            router: Self::build_router(state),
            config,
            live,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .fallback(gateway_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(spans::request_span))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    ///
    /// In-flight requests get `timeouts.shutdown_grace_secs` to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_reloader(self.live.clone(), config_updates);

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let mut forced = shutdown.resubscribe();

        let serve = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = async {
                let _ = forced.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace = ?grace, "Grace period elapsed, dropping remaining connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        spawn_reloader(self.live.clone(), config_updates);

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Swap in each validated reload.
fn spawn_reloader(
    live: Arc<ArcSwap<ProxyConfig>>,
    mut updates: mpsc::UnboundedReceiver<ProxyConfig>,
) {
    tokio::spawn(async move {
        while let Some(next) = updates.recv().await {
            let current = live.load_full();
            if current.listener != next.listener
                || current.timeouts != next.timeouts
                || current.observability != next.observability
            {
                tracing::warn!("Listener, timeout and observability changes take effect after restart");
            }
            startup::report_upstreams(&next);
            live.store(Arc::new(next));
            tracing::info!("Configuration reloaded");
        }
    });
}

#[derive(Serialize)]
struct SystemStatus {
    version: &'static str,
    status: &'static str,
}

async fn health_handler() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Main handler: classify the path and hand off to its mount.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let config = state.config.load_full();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request.request_id(),
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let Some(mount) = Mount::classify(&path, &config) else {
        tracing::debug!(path = %path, "No mount matched");
        metrics::record_request("none", method.as_str(), 404, start_time);
        return json_error(StatusCode::NOT_FOUND, "no route matches this path");
    };

    let response = match mount {
        Mount::Logout => session::logout(&method, &SessionCookies::from_config(&config)),
        Mount::Auth { endpoint } => {
            let cookies = SessionCookies::from_config(&config);
            auth::relay(&state.upstream, &config, &cookies, endpoint, request).await
        }
        Mount::Passthrough { path } => {
            passthrough::relay(&state.upstream, &config, path, request).await
        }
    };

    metrics::record_request(
        mount.label(),
        method.as_str(),
        response.status().as_u16(),
        start_time,
    );
    response
}
