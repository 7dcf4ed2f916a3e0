//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and required values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener.bind_address '{0}'")]
    BindAddress(String),

    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),

    #[error("admin.username must not be empty")]
    EmptyAdminUsername,

    #[error("routes.file must not be empty")]
    EmptyRoutesFile,

    #[error("timeouts.upstream_secs must be greater than zero")]
    ZeroUpstreamTimeout,
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.admin.username.is_empty() {
        errors.push(ValidationError::EmptyAdminUsername);
    }

    if config.routes.file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyRoutesFile);
    }

    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
