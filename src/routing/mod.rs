//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → table.rs (current snapshot, lock-free)
//!     → matcher.rs (first enabled prefix match)
//!     → Return: matched Route or no match
//!
//! Admin mutation:
//!     NewRoute / path
//!     → route.rs (validate fields)
//!     → list.rs (apply to a copy of the ordered list)
//!     → store (persist whole list)
//!     → table.rs (publish new snapshot)
//! ```
//!
//! # Design Decisions
//! - Routes are matched in insertion order, first match wins by default
//! - Lookups used for mutation are exact, matching is by prefix
//! - Changes take effect on the next request, no restart needed

pub mod list;
pub mod matcher;
pub mod route;
pub mod table;

pub use list::RouteList;
pub use matcher::{forward_uri, match_route, rewrite_path, MatchStrategy};
pub use route::{NewRoute, Route, RouteError};
pub use table::{RouteTable, TableError};
