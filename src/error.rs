use std::io;

use thiserror::Error;

/// Why a tabular resource could not be turned into records.
///
/// Every variant sends the whole dataset down the fallback path; the variant only tells the caller
/// which path was taken.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("resource '{resource}' is unavailable: {source}")]
    Missing {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("resource '{resource}' has no header row")]
    Empty { resource: String },
    #[error("resource '{resource}' is malformed at line {line}: {reason}")]
    Malformed {
        resource: String,
        line: usize,
        reason: String,
    },
}

impl LoadError {
    pub fn resource(&self) -> &str {
        match self {
            Self::Missing { resource, .. } | Self::Empty { resource } | Self::Malformed { resource, .. } => resource,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dashboard data has not been loaded yet")]
    NotLoaded,
    #[error("preference store error: {0}")]
    Preferences(#[from] rusqlite::Error),
    #[error("off-peak percentage {0} is outside 10..=90")]
    InvalidPercentage(u8),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown page '{0}'")]
    UnknownPage(String),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
