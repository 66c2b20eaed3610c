pub mod commands;
pub mod config;
pub mod db;
pub mod energy;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod navigation;
pub mod sample;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use crate::config::AppConfig;
pub use crate::db::Database;
pub use crate::error::{DashboardError, LoadError};
pub use crate::loader::{DirectorySource, MemorySource, ResourceSource};
pub use crate::metrics::{LoadStatus, MetricsEngine};
pub use crate::navigation::{Navigator, Page, PageView};
pub use crate::service::DataService;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    use commands::{dashboard, energy, green_score, navigation, preferences, seasonal, suppliers, waste};
    use tauri::Manager;
    use tracing::{error, info};

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let config_file = app.path().app_config_dir()?.join("config.json");
            let config = AppConfig::load(Some(&config_file))?;
            logging::init(&config.log_filter);

            let app_dir = app.path().app_data_dir()?;

            // Initialize database
            let db = Database::open(&config.database_path(&app_dir))?;
            db.initialize()?;
            let db = Arc::new(db);

            let data_dir = config.data_path(&app_dir);
            let service = Arc::new(DataService::from_config(&config, &app_dir));
            info!(data_dir = %data_dir.display(), "starting dashboard");

            // Warm the snapshot so the first page doesn't wait on disk.
            let warm = Arc::clone(&service);
            tauri::async_runtime::spawn(async move {
                warm.load().await;
            });

            app.manage(Navigator::new(Arc::clone(&service), Arc::clone(&db)));
            app.manage(db);
            app.manage(service);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Pages
            dashboard::get_dashboard,
            waste::get_waste_prediction,
            energy::get_energy_optimization,
            green_score::get_green_score,
            suppliers::get_supplier_analytics,
            seasonal::get_seasonal_analytics,
            // Navigation
            navigation::navigate,
            navigation::current_page,
            navigation::reload_data,
            // Preferences
            preferences::get_off_peak_percentage,
            preferences::set_off_peak_percentage,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!(error = %e, "error while running tauri application");
        std::process::exit(1);
    }
}
