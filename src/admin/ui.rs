//! Management UI hosting.
//!
//! The UI is a pre-built single-page app. Requests under the admin prefix
//! that the API does not claim are served from `ui.dir`; unknown sub-paths
//! get `index.html` so client-side routing works.

use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::http::dispatch::ADMIN_PREFIX;

pub const NOT_BUILT: &str = "Management UI not built yet.";

pub async fn serve_ui(ui_dir: &Path, request: Request<Body>) -> Response {
    let index = ui_dir.join("index.html");
    if !tokio::fs::try_exists(&index).await.unwrap_or(false) {
        return (StatusCode::NOT_FOUND, NOT_BUILT).into_response();
    }

    let (mut parts, body) = request.into_parts();
    parts.uri = ui_uri(&parts.uri);

    let service = ServeDir::new(ui_dir).fallback(ServeFile::new(index));
    match service.oneshot(Request::from_parts(parts, body)).await {
        Ok(response) => response.map(Body::new),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serve management UI");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Path below the admin prefix, as seen from the UI directory.
fn ui_uri(uri: &Uri) -> Uri {
    let rest = uri.path().strip_prefix(ADMIN_PREFIX).unwrap_or("/");
    let rest = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    };
    rest.parse().unwrap_or_else(|_| Uri::from_static("/"))
}
