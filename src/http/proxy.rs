//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the matched route's target
//! - Rewrite `Host` to the target authority and drop hop-by-hop headers
//! - Stream the request body up and the response back unchanged
//! - Turn any failure to reach the backend into a 502 naming the route
//! - Speak TLS to `https` targets, verified against the bundled web PKI roots
//!
//! # Design Decisions
//! - One attempt per request: a route has exactly one target, so there is
//!   nothing to retry against or fail over to
//! - No timeout unless `timeouts.upstream_secs` is set; it bounds the wait
//!   for the backend's response head

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::InvalidUri,
        Request, Version,
    },
    response::Response,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::http::response::bad_gateway_response;
use crate::observability::metrics;
use crate::routing::{forward_uri, rewrite_path, Route};

pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

/// The upstream client could not be configured.
#[derive(Debug, Error)]
#[error("failed to configure upstream TLS: {0}")]
pub struct ClientBuildError(#[from] rustls::Error);

/// Reasons a backend exchange did not produce a response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URI: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("{0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Headers scoped to a single connection (RFC 9110 §7.6.1).
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forwards matched requests to route targets.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    timeout: Option<Duration>,
}

impl Forwarder {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientBuildError> {
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }

    /// Forward `request` to `route` and relay whatever comes back.
    pub async fn forward(&self, route: &Route, request: Request<Body>) -> Response {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let start = Instant::now();

        match self.send(route, request).await {
            Ok(response) => {
                metrics::record_request("proxied");
                metrics::record_upstream(&route.name, response.status().as_u16(), start);
                tracing::debug!(
                    request_id = %request_id,
                    route = %route.name,
                    status = %response.status(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                metrics::record_request("bad_gateway");
                tracing::warn!(
                    request_id = %request_id,
                    route = %route.name,
                    target = %route.target,
                    error = %e,
                    "Upstream request failed"
                );
                bad_gateway_response(&route.name, &e.to_string())
            }
        }
    }

    async fn send(
        &self,
        route: &Route,
        request: Request<Body>,
    ) -> Result<Response<hyper::body::Incoming>, UpstreamError> {
        let (mut parts, body) = request.into_parts();

        let rewritten = rewrite_path(&route.path, parts.uri.path());
        let uri = forward_uri(&route.target, &rewritten, parts.uri.query())?;

        strip_hop_by_hop(&mut parts.headers);
        if let Some(host) = uri
            .authority()
            .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
        {
            parts.headers.insert(header::HOST, host);
        }

        tracing::debug!(route = %route.name, upstream = %uri, "Forwarding request");
        parts.uri = uri;
        parts.version = Version::HTTP_11;
        let upstream = self.client.request(Request::from_parts(parts, body));

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, upstream)
                .await
                .map_err(|_| UpstreamError::Timeout(limit))??,
            None => upstream.await?,
        };
        Ok(response)
    }
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}
