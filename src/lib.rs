//! Single-host HTTP reverse proxy gateway with a runtime-managed route table.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use routing::{Route, RouteTable};
pub use store::RouteStore;
