//! Route persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     routes.json → route_store.rs (read, parse, fail open to empty)
//!     → RouteList → RouteTable
//!
//! After every admin mutation:
//!     new RouteList → route_store.rs (serialize whole list)
//!     → temp file → rename over routes.json
//! ```
//!
//! # Design Decisions
//! - The whole list is rewritten each time, never a diff
//! - A corrupt or missing file degrades to "no routes", not a crash
//! - Write failures are returned to the caller, never swallowed

pub mod route_store;

pub use route_store::{RouteStore, StoreError};
