//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use pi_gateway::config::GatewayConfig;
use pi_gateway::routing::{Route, RouteList, RouteTable};
use pi_gateway::{GatewayServer, RouteStore, Shutdown};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "password";

pub fn route(path: &str, target: &str, name: &str, enabled: bool) -> Route {
    Route {
        path: path.into(),
        target: target.into(),
        name: name.into(),
        enabled,
    }
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

/// Start a backend that describes the request it received as JSON.
pub async fn start_echo_backend(label: &'static str) -> SocketAddr {
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            (
                [("x-backend", label)],
                Json(json!({
                    "backend": label,
                    "method": method.as_str(),
                    "path": uri.path(),
                    "query": uri.query(),
                    "host": header("host"),
                    "request_id": header("x-request-id"),
                    "body": String::from_utf8_lossy(&body),
                })),
            )
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing is listening on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Gateway configuration rooted in a temp dir: routes file inside it and a
/// UI directory that does not exist.
pub fn test_config(dir: &TempDir) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes.file = dir.path().join("routes.json");
    config.ui.dir = dir.path().join("ui");
    config
}

/// Seed the routes file and build the table the way the binary does.
pub async fn seeded_table(config: &GatewayConfig, routes: &[Route]) -> Arc<RouteTable> {
    let store = RouteStore::new(config.routes.file.clone());
    store.save(&RouteList::from(routes.to_vec())).await.unwrap();
    Arc::new(RouteTable::load(store, config.routes.match_strategy).await)
}

/// A gateway served on an ephemeral port, stopped on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub table: Arc<RouteTable>,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn start(routes: &[Route]) -> Self {
        Self::start_with(routes, |_| {}).await
    }

    pub async fn start_with(routes: &[Route], customize: impl FnOnce(&mut GatewayConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        customize(&mut config);
        let table = seeded_table(&config, routes).await;

        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = GatewayServer::new(config, table.clone()).unwrap();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            addr,
            dir,
            table,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
