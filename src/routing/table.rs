//! Shared route table.
//!
//! # Responsibilities
//! - Publish immutable snapshots of the route list to request handlers
//! - Serialize admin mutations and persist each one before publishing it
//!
//! # Design Decisions
//! - Readers load an `Arc<RouteList>` from an `ArcSwap`: no lock on the
//!   proxy path and never a half-applied mutation
//! - A single async mutex owns the store, so at most one mutation (and one
//!   file write) is in flight
//! - A failed save discards the mutation: what is served is what is stored

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::routing::list::RouteList;
use crate::routing::matcher::MatchStrategy;
use crate::routing::route::{NewRoute, Route, RouteError};
use crate::store::{RouteStore, StoreError};

/// Errors from a table mutation.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("route change was not persisted: {0}")]
    Persist(#[from] StoreError),
}

pub struct RouteTable {
    current: ArcSwap<RouteList>,
    writer: Mutex<RouteStore>,
    strategy: MatchStrategy,
}

impl RouteTable {
    pub fn new(routes: RouteList, store: RouteStore, strategy: MatchStrategy) -> Self {
        Self {
            current: ArcSwap::from_pointee(routes),
            writer: Mutex::new(store),
            strategy,
        }
    }

    /// Populate the table from the store (fail-open).
    pub async fn load(store: RouteStore, strategy: MatchStrategy) -> Self {
        let routes = store.load().await;
        tracing::info!(
            path = %store.path().display(),
            routes = routes.len(),
            enabled = routes.iter().filter(|r| r.enabled).count(),
            "Route table loaded"
        );
        Self::new(routes, store, strategy)
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Current routes, consistent for as long as the caller holds them.
    pub fn snapshot(&self) -> Arc<RouteList> {
        self.current.load_full()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    pub fn find(&self, path: &str) -> Option<Route> {
        self.current.load().find(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.current.load().contains(path)
    }

    /// Route a request path is dispatched to, if any.
    pub fn match_path(&self, path: &str) -> Option<Route> {
        self.current.load().match_path(path, self.strategy).cloned()
    }

    pub async fn add(&self, new_route: NewRoute) -> Result<Route, TableError> {
        self.mutate(|routes| routes.add(new_route).cloned()).await
    }

    pub async fn remove(&self, path: &str) -> Result<Route, TableError> {
        self.mutate(|routes| routes.remove(path)).await
    }

    pub async fn set_enabled(
        &self,
        path: &str,
        enabled: Option<bool>,
    ) -> Result<Route, TableError> {
        self.mutate(|routes| routes.set_enabled(path, enabled).cloned()).await
    }

    /// Apply `op` to a copy of the current list, persist, then publish.
    async fn mutate<F>(&self, op: F) -> Result<Route, TableError>
    where
        F: FnOnce(&mut RouteList) -> Result<Route, RouteError>,
    {
        let store = self.writer.lock().await;

        let mut next = RouteList::clone(&self.current.load());
        let route = op(&mut next)?;

        if let Err(e) = store.save(&next).await {
            tracing::error!(
                error = %e,
                path = %route.path,
                "Failed to persist route change, discarding it"
            );
            return Err(TableError::Persist(e));
        }

        self.current.store(Arc::new(next));
        Ok(route)
    }
}
