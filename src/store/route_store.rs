//! JSON file persistence for the route table.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::RouteList;

/// Errors from reading or writing the route file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode routes: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to parse {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape: `{ "routes": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RoutesFile {
    #[serde(default)]
    routes: RouteList,
}

/// Loads and saves the route list as a JSON file.
#[derive(Debug, Clone)]
pub struct RouteStore {
    path: PathBuf,
}

impl RouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the route list, treating any failure as an empty table.
    pub async fn load(&self) -> RouteList {
        match self.try_load().await {
            Ok(routes) => routes,
            Err(StoreError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    "Route file not found, starting with no routes"
                );
                RouteList::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load routes, starting with no routes");
                RouteList::new()
            }
        }
    }

    /// Read the route list, reporting why it could not be read.
    ///
    /// Repeated paths in a hand-edited file keep their first occurrence.
    pub async fn try_load(&self) -> Result<RouteList, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        let file: RoutesFile = serde_json::from_str(&content).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })?;

        let mut routes = file.routes;
        for dropped in routes.dedup_paths() {
            tracing::warn!(
                path = %dropped.path,
                name = %dropped.name,
                "Ignoring route with duplicate path"
            );
        }
        Ok(routes)
    }

    /// Serialize the whole list and replace the route file.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never see a half-written file.
    pub async fn save(&self, routes: &RouteList) -> Result<(), StoreError> {
        let file = RoutesFile {
            routes: routes.clone(),
        };
        let mut content = serde_json::to_string_pretty(&file).map_err(StoreError::Encode)?;
        content.push('\n');

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, content.as_bytes()).await.map_err(io_err)?;
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(source));
        }

        tracing::debug!(path = %self.path.display(), routes = routes.len(), "Saved routes");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("routes.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
