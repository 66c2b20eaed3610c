use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::energy::{self, DEFAULT_OFF_PEAK_PCT};
use crate::error::{DashboardError, Result};

pub const OFF_PEAK_KEY: &str = "off_peak_slider_value";

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DashboardError::Config(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path)?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock();

        conn.execute_batch(
            "
            -- UI preferences that survive restarts
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            ",
        )?;

        Ok(())
    }

    pub fn preference(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let value = conn
            .query_row("SELECT value FROM preferences WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            [key, value],
        )?;
        Ok(())
    }

    /// Stored slider value clamped to 10..=90, or 50 when nothing usable is stored.
    pub fn off_peak_percentage(&self) -> Result<u8> {
        let stored = self.preference(OFF_PEAK_KEY)?;
        Ok(stored
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|v| energy::clamp_percentage(v.clamp(0, i64::from(u8::MAX)) as u8))
            .unwrap_or(DEFAULT_OFF_PEAK_PCT))
    }

    pub fn set_off_peak_percentage(&self, percentage: u8) -> Result<()> {
        if energy::clamp_percentage(percentage) != percentage {
            return Err(DashboardError::InvalidPercentage(percentage));
        }
        debug!(percentage, "storing off-peak percentage");
        self.set_preference(OFF_PEAK_KEY, &percentage.to_string())
    }
}

#[cfg(feature = "desktop")]
mod app {
    use std::sync::Arc;

    use super::Database;
    use tauri::{AppHandle, Manager};

    pub trait DatabaseExt {
        fn db(&self) -> &Database;
    }

    impl DatabaseExt for AppHandle {
        fn db(&self) -> &Database {
            self.state::<Arc<Database>>().inner().as_ref()
        }
    }
}

#[cfg(feature = "desktop")]
pub use app::DatabaseExt;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Database {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to create schema");
        db
    }

    #[test]
    fn test_off_peak_defaults_to_fifty() {
        let db = setup_test_db();
        assert_eq!(db.off_peak_percentage().unwrap(), 50);
    }

    #[test]
    fn test_off_peak_round_trip() {
        let db = setup_test_db();
        db.set_off_peak_percentage(70).unwrap();
        db.set_off_peak_percentage(35).unwrap();
        assert_eq!(db.off_peak_percentage().unwrap(), 35);

        let count: i32 = db
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_out_of_range_write_rejected() {
        let db = setup_test_db();
        assert!(matches!(
            db.set_off_peak_percentage(95),
            Err(DashboardError::InvalidPercentage(95))
        ));
        assert!(db.set_off_peak_percentage(9).is_err());
    }

    #[test]
    fn test_stored_garbage_is_clamped_or_ignored() {
        let db = setup_test_db();
        db.set_preference(OFF_PEAK_KEY, "400").unwrap();
        assert_eq!(db.off_peak_percentage().unwrap(), 90);

        db.set_preference(OFF_PEAK_KEY, "abc").unwrap();
        assert_eq!(db.off_peak_percentage().unwrap(), 50);
    }

    #[test]
    fn test_initialize_is_repeatable() {
        let db = setup_test_db();
        db.initialize().unwrap();
        db.set_preference("theme", "dark").unwrap();
        assert_eq!(db.preference("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("wastezero.db");
        {
            let db = Database::open(&path).unwrap();
            db.initialize().unwrap();
            db.set_off_peak_percentage(80).unwrap();
        }
        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.off_peak_percentage().unwrap(), 80);
    }
}
