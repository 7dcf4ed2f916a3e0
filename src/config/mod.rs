//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → command-line overrides (main.rs)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults, so the gateway runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Routes are runtime state, persisted separately (see `store`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RoutesConfig, TimeoutConfig,
    UiConfig,
};
pub use validation::{validate_config, ValidationError};
