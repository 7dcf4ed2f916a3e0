//! Management surface.
//!
//! # Data Flow
//! ```text
//! /management/api/*
//!     → auth.rs (basic auth: 401 missing, 403 wrong)
//!     → handlers.rs (login, list, add, remove, update; 404 otherwise)
//!     → RouteTable mutation (persisted before responding)
//!
//! any other /management path (via the dispatcher)
//!     → ui.rs (static SPA with index.html fallback)
//! ```

pub mod auth;
pub mod handlers;
pub mod ui;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

pub use self::auth::{AdminCredentials, AuthOutcome};
use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

/// Namespace of the management API.
pub const API_PREFIX: &str = "/management/api";

/// Largest accepted management request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Authenticated API routes, to be merged into the gateway router.
///
/// Authentication wraps the whole `/management/api` namespace, including
/// paths with no handler, which get a JSON 404 once the caller is admitted.
pub fn api_router(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/login", post(login))
        .route(
            "/routes",
            get(list_routes)
                .post(add_route)
                .delete(remove_route)
                .patch(update_route),
        )
        .fallback(unknown_endpoint)
        .layer(middleware::from_fn_with_state(
            state.credentials.clone(),
            admin_auth_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Router::new().nest(API_PREFIX, api)
}
