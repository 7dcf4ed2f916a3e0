//! Management API handlers.
//!
//! Every mutation goes through the shared route table, which persists the
//! change before it becomes visible. Responses carry the affected route.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{NewRoute, Route, TableError};

#[derive(Serialize)]
pub struct LoginStatus {
    pub status: &'static str,
    pub user: String,
}

/// Body of `POST /routes`. Absent fields are reported together.
#[derive(Debug, Default, Deserialize)]
pub struct AddRouteRequest {
    pub path: Option<String>,
    pub target: Option<String>,
    pub name: Option<String>,
}

/// Body of `DELETE /routes`.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveRouteRequest {
    pub path: Option<String>,
}

/// Body of `PATCH /routes`. `enabled` is applied only when it is a boolean.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRouteRequest {
    pub path: Option<String>,
    pub enabled: Option<Value>,
}

type ApiResult<T> = Result<T, ApiError>;

pub async fn login(State(state): State<AppState>) -> Json<LoginStatus> {
    Json(LoginStatus {
        status: "ok",
        user: state.credentials.username().to_string(),
    })
}

/// All routes in table order, disabled ones included.
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(state.table.snapshot().routes().to_vec())
}

pub async fn add_route(
    State(state): State<AppState>,
    payload: Result<Json<AddRouteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Route>)> {
    let Json(req) = payload?;
    let new_route = NewRoute::new(
        req.path.unwrap_or_default(),
        req.target.unwrap_or_default(),
        req.name.unwrap_or_default(),
    );

    let route = record("add", state.table.add(new_route).await)?;
    tracing::info!(path = %route.path, target = %route.target, name = %route.name, "Route added");
    metrics::record_route_count(state.table.len());
    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn remove_route(
    State(state): State<AppState>,
    payload: Result<Json<RemoveRouteRequest>, JsonRejection>,
) -> ApiResult<Json<Route>> {
    let Json(req) = payload?;
    let path = required_path(req.path)?;

    let route = record("remove", state.table.remove(&path).await)?;
    tracing::info!(path = %route.path, name = %route.name, "Route removed");
    metrics::record_route_count(state.table.len());
    Ok(Json(route))
}

pub async fn update_route(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRouteRequest>, JsonRejection>,
) -> ApiResult<Json<Route>> {
    let Json(req) = payload?;
    let path = required_path(req.path)?;
    let enabled = req.enabled.as_ref().and_then(Value::as_bool);

    let route = record("update", state.table.set_enabled(&path, enabled).await)?;
    tracing::info!(path = %route.path, enabled = route.enabled, "Route updated");
    Ok(Json(route))
}

/// Fallback for authenticated requests to paths the API does not serve.
pub async fn unknown_endpoint() -> ApiError {
    ApiError::NotFound("Unknown management endpoint".to_string())
}

fn required_path(path: Option<String>) -> ApiResult<String> {
    path.filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: path".to_string()))
}

fn record(op: &'static str, result: Result<Route, TableError>) -> ApiResult<Route> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(TableError::Persist(_)) => "persist_failed",
        Err(TableError::Route(_)) => "rejected",
    };
    metrics::record_mutation(op, outcome);
    result.map_err(ApiError::from)
}
