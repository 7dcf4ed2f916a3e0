//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
