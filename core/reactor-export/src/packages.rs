//! Per-run extension package cache.

use reactor_source::{RemoteSource, SourceResult};
use reactor_types::ExtensionPackage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

/// Fetches each extension package at most once per export run.
///
/// Concurrent requests for one package share a single in-flight fetch. A
/// failed fetch leaves the slot empty, so a later request retries it.
#[derive(Debug, Default)]
pub struct PackageCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<ExtensionPackage>>>>>,
}

impl PackageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the package, fetching it from `source` on first use.
    pub async fn get(
        &self,
        source: &dyn RemoteSource,
        package_id: &str,
    ) -> SourceResult<Arc<ExtensionPackage>> {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(package_id.to_string()).or_default())
        };

        cell.get_or_try_init(|| async {
            debug!("Fetching extension package {}", package_id);
            source.get_extension_package(package_id).await.map(Arc::new)
        })
        .await
        .cloned()
    }

    /// Number of packages fetched successfully so far.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
