//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Hand unclaimed requests to the dispatcher

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::admin::{self, AdminCredentials};
use crate::config::GatewayConfig;
use crate::http::dispatch::dispatch;
use crate::http::health::health;
use crate::http::proxy::{ClientBuildError, Forwarder};
use crate::lifecycle::shutdown;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub forwarder: Forwarder,
    pub credentials: Arc<AdminCredentials>,
    pub ui_dir: Arc<PathBuf>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server over an already loaded route table.
    pub fn new(config: GatewayConfig, table: Arc<RouteTable>) -> Result<Self, ClientBuildError> {
        let state = AppState {
            table,
            forwarder: Forwarder::new(config.timeouts.upstream_secs.map(Duration::from_secs))?,
            credentials: Arc::new(AdminCredentials::new(
                config.admin.username.clone(),
                config.admin.password.clone(),
            )),
            ui_dir: Arc::new(config.ui.dir.clone()),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/health` and the management API are claimed first; everything else,
    /// including other methods on `/health`, falls through to the dispatcher.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health).fallback(dispatch))
            .merge(admin::api_router(state.clone()))
            .fallback(dispatch)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
