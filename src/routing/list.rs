//! Ordered route list.
//!
//! Insertion order is significant: it is the scan order for `FirstMatch`
//! and the tie-break order for `LongestPrefix`.

use serde::{Deserialize, Serialize};

use crate::routing::matcher::{match_route, MatchStrategy};
use crate::routing::route::{NewRoute, Route, RouteError};

/// The pure, unshared form of the route table.
///
/// Every fallible operation leaves the list untouched when it returns `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteList {
    routes: Vec<Route>,
}

impl RouteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn find_index(&self, path: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find_index(path).is_some()
    }

    /// Validate and append a new, enabled route.
    pub fn add(&mut self, new_route: NewRoute) -> Result<&Route, RouteError> {
        new_route.validate()?;
        if self.contains(&new_route.path) {
            return Err(RouteError::Duplicate(new_route.path));
        }
        self.routes.push(new_route.into_route());
        Ok(&self.routes[self.routes.len() - 1])
    }

    /// Remove the route with exactly this path and return it.
    pub fn remove(&mut self, path: &str) -> Result<Route, RouteError> {
        let index = self
            .find_index(path)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))?;
        Ok(self.routes.remove(index))
    }

    /// Set `enabled` when a value is given; `None` leaves the route as is.
    pub fn set_enabled(&mut self, path: &str, enabled: Option<bool>) -> Result<&Route, RouteError> {
        let route = self.find_mut(path)?;
        if let Some(enabled) = enabled {
            route.enabled = enabled;
        }
        Ok(route)
    }

    /// Flip `enabled`.
    pub fn toggle(&mut self, path: &str) -> Result<&Route, RouteError> {
        let route = self.find_mut(path)?;
        route.enabled = !route.enabled;
        Ok(route)
    }

    pub fn match_path(&self, path: &str, strategy: MatchStrategy) -> Option<&Route> {
        match_route(&self.routes, path, strategy)
    }

    /// Drop later routes that repeat an earlier path. Returns the dropped ones.
    pub fn dedup_paths(&mut self) -> Vec<Route> {
        let mut kept: Vec<Route> = Vec::with_capacity(self.routes.len());
        let mut dropped = Vec::new();
        for route in self.routes.drain(..) {
            if kept.iter().any(|r| r.path == route.path) {
                dropped.push(route);
            } else {
                kept.push(route);
            }
        }
        self.routes = kept;
        dropped
    }

    fn find_mut(&mut self, path: &str) -> Result<&mut Route, RouteError> {
        self.routes
            .iter_mut()
            .find(|r| r.path == path)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }
}

impl From<Vec<Route>> for RouteList {
    fn from(routes: Vec<Route>) -> Self {
        Self { routes }
    }
}

impl<'a> IntoIterator for &'a RouteList {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
