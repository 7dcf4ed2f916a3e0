//! Request dispatch.
//!
//! Every request not claimed by `/health` or the management API lands here
//! and is classified, in this order:
//! 1. under the admin prefix → management UI, never proxied
//! 2. an enabled route matches → forwarded
//! 3. otherwise → 404 pointing at the route listing

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
};

use crate::admin::ui::serve_ui;
use crate::http::response::no_route_response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{MatchStrategy, Route, RouteList};

/// Reserved namespace for management; shadows any configured route.
pub const ADMIN_PREFIX: &str = "/management";

/// Where clients can discover the configured routes.
pub const ROUTES_ENDPOINT: &str = "/management/api/routes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Management,
    Proxy(Route),
    Unmatched,
}

pub fn classify(path: &str, routes: &RouteList, strategy: MatchStrategy) -> Dispatch {
    if path.starts_with(ADMIN_PREFIX) {
        return Dispatch::Management;
    }
    match routes.match_path(path, strategy) {
        Some(route) => Dispatch::Proxy(route.clone()),
        None => Dispatch::Unmatched,
    }
}

/// Fallback handler for the gateway router.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let routes = state.table.snapshot();
    let decision = classify(request.uri().path(), &routes, state.table.strategy());
    drop(routes);

    match decision {
        Dispatch::Management => {
            metrics::record_request("management");
            serve_ui(&state.ui_dir, request).await
        }
        Dispatch::Proxy(route) => state.forwarder.forward(&route, request).await,
        Dispatch::Unmatched => {
            metrics::record_request("unmatched");
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "No route matched"
            );
            no_route_response()
        }
    }
}
