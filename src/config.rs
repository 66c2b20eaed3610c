use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// `WASTEZERO_DATA_DIR`, `WASTEZERO_DATABASE_FILE` and `WASTEZERO_LOG_FILTER` override the file.
pub const ENV_PREFIX: &str = "WASTEZERO";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `inventory.csv`, `sales.csv` and `suppliers.csv`. Relative paths resolve
    /// against the app data directory.
    pub data_dir: PathBuf,
    /// Preference database. Relative paths resolve against the app data directory.
    pub database_file: PathBuf,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database_file: PathBuf::from("wastezero.db"),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by the JSON file at `path` if it exists, overlaid by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Json).required(false));
        }

        builder
            .add_source(env)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn database_path(&self, app_dir: &Path) -> PathBuf {
        resolve(&self.database_file, app_dir)
    }

    pub fn data_path(&self, app_dir: &Path) -> PathBuf {
        resolve(&self.data_dir, app_dir)
    }
}

fn resolve(path: &Path, app_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        app_dir.join(path)
    }
}
