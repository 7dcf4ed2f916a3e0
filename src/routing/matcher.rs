//! Route matching and path rewriting.
//!
//! # Responsibilities
//! - Select the route for a request path (prefix comparison)
//! - Strip the matched prefix from the forwarded path
//! - Join the rewritten path onto a route's target
//!
//! # Design Decisions
//! - Path matching is byte-wise and case-sensitive
//! - No trailing-slash normalization and no segment boundaries:
//!   `/apix` matches the prefix `/api`
//! - Disabled routes are skipped
//! - `FirstMatch` (table order) is the default tie-break

use axum::http::uri::InvalidUri;
use axum::http::Uri;
use serde::{Deserialize, Serialize};

use crate::routing::route::Route;

/// Rule used when several enabled routes are prefixes of the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Earliest-inserted matching route wins.
    #[default]
    FirstMatch,
    /// Longest matching prefix wins; insertion order breaks ties.
    LongestPrefix,
}

/// Find the route a request path is dispatched to, if any.
pub fn match_route<'a>(
    routes: &'a [Route],
    path: &str,
    strategy: MatchStrategy,
) -> Option<&'a Route> {
    let mut candidates = routes
        .iter()
        .filter(|route| route.enabled && path.starts_with(route.path.as_str()));

    match strategy {
        MatchStrategy::FirstMatch => candidates.next(),
        MatchStrategy::LongestPrefix => {
            candidates.fold(None, |best: Option<&Route>, route| match best {
                Some(current) if current.path.len() >= route.path.len() => Some(current),
                _ => Some(route),
            })
        }
    }
}

/// Strip the route prefix once from the start of `path`.
///
/// An empty remainder becomes `/`. A remainder without a leading slash
/// (`/apix` under `/api`) gets one so it can be appended to a target.
pub fn rewrite_path(prefix: &str, path: &str) -> String {
    let rest = path.strip_prefix(prefix).unwrap_or(path);
    if rest.is_empty() {
        "/".to_string()
    } else if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    }
}

/// Build the upstream URI: target base, rewritten path, original query.
pub fn forward_uri(target: &str, rewritten: &str, query: Option<&str>) -> Result<Uri, InvalidUri> {
    let base = target.trim_end_matches('/');
    let uri = match query {
        Some(q) => format!("{}{}?{}", base, rewritten, q),
        None => format!("{}{}", base, rewritten),
    };
    uri.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str, target: &str, enabled: bool) -> Route {
        Route {
            path: path.into(),
            target: target.into(),
            name: format!("{} route", path),
            enabled,
        }
    }

    #[test]
    fn test_first_match_wins_over_longer_prefix() {
        let routes = vec![route("/api", "http://h1", true), route("/api/v2", "http://h2", true)];

        let matched = match_route(&routes, "/api/v2/x", MatchStrategy::FirstMatch).unwrap();
        assert_eq!(matched.target, "http://h1");
    }

    #[test]
    fn test_longest_prefix_strategy() {
        let routes = vec![route("/api", "http://h1", true), route("/api/v2", "http://h2", true)];

        let matched = match_route(&routes, "/api/v2/x", MatchStrategy::LongestPrefix).unwrap();
        assert_eq!(matched.target, "http://h2");

        let matched = match_route(&routes, "/api/v1", MatchStrategy::LongestPrefix).unwrap();
        assert_eq!(matched.target, "http://h1");
    }

    #[test]
    fn test_disabled_routes_never_match() {
        let routes = vec![route("/api", "http://h1", false), route("/a", "http://h2", true)];

        let matched = match_route(&routes, "/api/users", MatchStrategy::FirstMatch).unwrap();
        assert_eq!(matched.target, "http://h2");
        assert!(match_route(&routes[..1], "/api/users", MatchStrategy::FirstMatch).is_none());
        assert!(match_route(&routes[..1], "/api/users", MatchStrategy::LongestPrefix).is_none());
    }

    #[test]
    fn test_prefix_has_no_segment_boundary() {
        let routes = vec![route("/api", "http://h1", true)];
        assert!(match_route(&routes, "/apix", MatchStrategy::FirstMatch).is_some());
        assert!(match_route(&routes, "/ap", MatchStrategy::FirstMatch).is_none());
        assert!(match_route(&routes, "/API", MatchStrategy::FirstMatch).is_none());
    }

    #[test]
    fn test_rewrite_strips_leftmost_prefix_only() {
        assert_eq!(rewrite_path("/api", "/api/users"), "/users");
        assert_eq!(rewrite_path("/api", "/api/api/users"), "/api/users");
        assert_eq!(rewrite_path("/api", "/api"), "/");
        assert_eq!(rewrite_path("/api/", "/api/"), "/");
        assert_eq!(rewrite_path("/api", "/apix"), "/x");
    }

    #[test]
    fn test_forward_uri_preserves_query() {
        let rewritten = rewrite_path("/api", "/api/users");
        let uri = forward_uri("http://localhost:4000", &rewritten, Some("x=1")).unwrap();
        assert_eq!(uri.to_string(), "http://localhost:4000/users?x=1");
        assert_eq!(uri.path(), "/users");
        assert_eq!(uri.query(), Some("x=1"));
    }

    #[test]
    fn test_forward_uri_with_target_base_path() {
        let uri = forward_uri("http://10.0.0.2:3001/base/", "/posts", None).unwrap();
        assert_eq!(uri.to_string(), "http://10.0.0.2:3001/base/posts");
    }
}
