//! Route records and input validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A configured forwarding rule: requests whose path starts with `path`
/// are forwarded to `target` with the prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Path prefix, always starting with `/`. Unique within a table.
    pub path: String,

    /// Backend base URL (scheme, host, optional port and base path).
    pub target: String,

    /// Human-readable label used in listings and error payloads.
    pub name: String,

    /// Disabled routes stay in storage but are never matched.
    #[serde(default)]
    pub enabled: bool,
}

/// Input for creating a route. New routes always start enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewRoute {
    pub path: String,
    pub target: String,
    pub name: String,
}

impl NewRoute {
    pub fn new(
        path: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
            name: name.into(),
        }
    }

    /// Check field presence, path shape and target URL, in that order.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.path.trim().is_empty()
            || self.target.trim().is_empty()
            || self.name.trim().is_empty()
        {
            return Err(RouteError::MissingFields);
        }

        if !self.path.starts_with('/') {
            return Err(RouteError::InvalidPath(self.path.clone()));
        }

        validate_target(&self.target)
    }

    pub(crate) fn into_route(self) -> Route {
        Route {
            path: self.path,
            target: self.target,
            name: self.name,
            enabled: true,
        }
    }
}

/// Errors produced by route table operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Missing required fields: path, target, name")]
    MissingFields,

    #[error("Route path must start with '/': {0}")]
    InvalidPath(String),

    #[error("Invalid target URL '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Route already exists: {0}")]
    Duplicate(String),

    #[error("Route not found: {0}")]
    NotFound(String),
}

fn validate_target(target: &str) -> Result<(), RouteError> {
    let invalid = |reason: &str| RouteError::InvalidTarget {
        target: target.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(target).map_err(|e| invalid(&e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(&format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(())
}
