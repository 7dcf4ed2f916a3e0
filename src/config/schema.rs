//! Configuration schema definitions.
//!
//! This module defines the gateway settings. The route list itself is not
//! part of this file; it lives in the JSON file named by `routes.file`.
//! All types derive Serde traits for deserialization from TOML.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::MatchStrategy;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Admin identity for the management API.
    pub admin: AdminConfig,

    /// Route file location and matching rule.
    pub routes: RoutesConfig,

    /// Management UI bundle.
    pub ui: UiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Keep the bind host and replace the port.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.bind_address.parse::<SocketAddr>() {
            Ok(addr) => addr.ip(),
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        self.bind_address = SocketAddr::new(host, port).to_string();
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Admin credentials checked with HTTP basic auth.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,

    // WARNING: the default is a placeholder. Override it with --password.
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path of the persisted route list (JSON).
    pub file: PathBuf,

    /// Tie-break between overlapping prefixes.
    pub match_strategy: MatchStrategy,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("config/routes.json"),
            match_strategy: MatchStrategy::FirstMatch,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Directory holding the built management UI (`index.html` + assets).
    pub dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("client/dist"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on the wait for a backend response head, in seconds.
    /// Unset means no limit beyond the transport's own behavior.
    pub upstream_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
