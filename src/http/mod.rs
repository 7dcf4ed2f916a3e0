//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → /health → health.rs
//!     → /management/api/* → admin (auth, route mutations)
//!     → anything else → dispatch.rs
//!         → admin prefix → admin UI
//!         → route match  → proxy.rs → backend
//!         → no match     → response.rs (404)
//! ```

pub mod dispatch;
pub mod health;
pub mod proxy;
pub mod response;
pub mod server;

pub use dispatch::{classify, Dispatch, ADMIN_PREFIX, ROUTES_ENDPOINT};
pub use proxy::{ClientBuildError, Forwarder};
pub use response::ApiError;
pub use server::{AppState, GatewayServer};
