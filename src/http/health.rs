//! Public liveness endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// RFC 3339 / ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
}

/// `GET /health`: always 200, no authentication.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
