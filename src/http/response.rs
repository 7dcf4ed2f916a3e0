//! Error responses.
//!
//! # Responsibilities
//! - Map gateway and admin failures to HTTP status codes
//! - Render every error as a JSON object with an `error` field
//!
//! # Design Decisions
//! - Validation failures are 4xx with a descriptive `message`
//! - A route change that could not be persisted is a 500, so the admin
//!   caller learns that nothing changed

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::dispatch::ROUTES_ENDPOINT;
use crate::routing::{RouteError, TableError};

/// Errors returned by the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Forbidden,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Internal(m) => Some(m),
            ApiError::Unauthorized | ApiError::Forbidden => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let label = status.canonical_reason().unwrap_or("Error");
        let body = match self.message() {
            Some(message) => json!({ "error": label, "message": message }),
            None => json!({ "error": label }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::MissingFields
            | RouteError::InvalidPath(_)
            | RouteError::InvalidTarget { .. } => ApiError::BadRequest(err.to_string()),
            RouteError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            RouteError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<TableError> for ApiError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Route(e) => e.into(),
            TableError::Persist(e) => {
                ApiError::Internal(format!("Route change was not saved: {}", e))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// 404 for a path no enabled route covers.
pub fn no_route_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "No route configured for this path",
            "availableRoutes": ROUTES_ENDPOINT,
        })),
    )
        .into_response()
}

/// 502 naming the route whose backend could not be reached.
pub fn bad_gateway_response(route_name: &str, reason: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": "Bad Gateway",
            "message": format!("Backend for route '{}' is unavailable: {}", route_name, reason),
            "route": route_name,
        })),
    )
        .into_response()
}
