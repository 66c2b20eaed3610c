//! The one data-access service every page shares.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{DashboardError, Result};
use crate::loader::{DirectorySource, ResourceSource};
use crate::metrics::MetricsEngine;

/// Holds the current [`MetricsEngine`] snapshot.
///
/// Built once per process and handed to pages by reference. Pages read snapshots; only
/// [`DataService::reload`] replaces one.
pub struct DataService {
    source: Box<dyn ResourceSource>,
    engine: RwLock<Option<Arc<MetricsEngine>>>,
}

impl DataService {
    pub fn new(source: impl ResourceSource) -> Self {
        Self {
            source: Box::new(source),
            engine: RwLock::new(None),
        }
    }

    /// Reads from the configured data directory, relative paths taken from `app_dir`.
    pub fn from_config(config: &AppConfig, app_dir: &Path) -> Self {
        Self::new(DirectorySource::new(config.data_path(app_dir)))
    }

    /// Loads the dataset unless a snapshot already exists. Concurrent callers share one load.
    pub async fn load(&self) -> Arc<MetricsEngine> {
        if let Some(engine) = self.engine.read().await.as_ref() {
            return Arc::clone(engine);
        }

        let mut slot = self.engine.write().await;
        if let Some(engine) = slot.as_ref() {
            return Arc::clone(engine);
        }
        let engine = Arc::new(MetricsEngine::load(self.source.as_ref()).await);
        *slot = Some(Arc::clone(&engine));
        engine
    }

    /// Reads every resource again and swaps in the new snapshot. Readers holding the old one keep it.
    pub async fn reload(&self) -> Arc<MetricsEngine> {
        let engine = Arc::new(MetricsEngine::load(self.source.as_ref()).await);
        info!(fallback = engine.status().is_fallback(), "dataset reloaded");
        *self.engine.write().await = Some(Arc::clone(&engine));
        engine
    }

    pub async fn engine(&self) -> Result<Arc<MetricsEngine>> {
        self.engine
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(DashboardError::NotLoaded)
    }

    pub async fn is_loaded(&self) -> bool {
        self.engine.read().await.is_some()
    }
}

#[cfg(feature = "desktop")]
mod app {
    use std::sync::Arc;

    use super::DataService;
    use tauri::{AppHandle, Manager};

    pub trait DataServiceExt {
        fn data(&self) -> Arc<DataService>;
    }

    impl DataServiceExt for AppHandle {
        fn data(&self) -> Arc<DataService> {
            Arc::clone(self.state::<Arc<DataService>>().inner())
        }
    }
}

#[cfg(feature = "desktop")]
pub use app::DataServiceExt;
