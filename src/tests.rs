//! End-to-end tests: data files on disk through the metrics engine to rendered pages.
//! Each test writes its own CSVs into a temporary directory.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    use crate::commands::{energy, seasonal, suppliers, waste};
    use crate::config::AppConfig;
    use crate::db::Database;
    use crate::error::LoadError;
    use crate::loader::{DirectorySource, INVENTORY, SALES, SUPPLIERS};
    use crate::metrics::MetricsEngine;
    use crate::models::{MetricSource, PowerSetting};
    use crate::navigation::{Navigator, Page, PageView};
    use crate::service::DataService;

    const INVENTORY_CSV: &str = "\
product_id,product_name,category,supplier_id,purchase_date,expiry_date,expiry_type,quantity_in_stock,cost_price,selling_price,seasonal_demand_factor
A1,Yogurt,Groceries,S1,2024-01-25,2024-02-05,Perishable,20,1.00,2.00,1.0
A2,Headphones,Electronics,S2,2023-10-01,2025-10-01,Warranty Period,150,20.00,45.00,1.2
";

    const SALES_CSV: &str = "\
product_id,timestamp,quantity_sold
A1,2024-01-30 09:00:00,4
A1,2024-01-31 18:30:00,2
A2,2024-01-20 12:00:00,1
";

    const SUPPLIERS_CSV: &str = "\
supplier_id,supplier_name,reliability_score,delivery_time_days,contact_email,phone
S1,Valley Dairy,4.5,2,orders@valley.example,+1-555-0301
S2,Gadget Hub,3.5,14,sales@gadgethub.example,+1-555-0302
";

    /// Create a data directory holding the given resources
    fn setup_data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (resource, text) in files {
            fs::write(dir.path().join(format!("{resource}.csv")), text).expect("Failed to write resource");
        }
        dir
    }

    fn full_data_dir() -> TempDir {
        setup_data_dir(&[(INVENTORY, INVENTORY_CSV), (SALES, SALES_CSV), (SUPPLIERS, SUPPLIERS_CSV)])
    }

    async fn load_from(dir: &Path) -> MetricsEngine {
        MetricsEngine::load(&DirectorySource::new(dir)).await
    }

    fn feb_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn setup_test_db() -> Arc<Database> {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to create schema");
        Arc::new(db)
    }

    // ==================== LOADING ====================

    #[tokio::test]
    async fn test_loads_all_three_resources() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;

        assert!(!engine.status().is_fallback());
        assert_eq!(engine.dataset().inventory.len(), 2);
        assert_eq!(engine.dataset().sales.len(), 3);
        assert_eq!(engine.supplier_count(), 2);
        assert_eq!(engine.dataset().inventory[1].expiry_type, "Warranty Period");
    }

    #[tokio::test]
    async fn test_missing_resource_falls_back_for_all() {
        let dir = setup_data_dir(&[(INVENTORY, INVENTORY_CSV), (SALES, SALES_CSV)]);
        let engine = load_from(dir.path()).await;

        // Loaded inventory and sales are discarded along with the missing suppliers
        assert!(engine.status().is_fallback());
        let cause = engine.status().cause().unwrap();
        assert_eq!(cause.resource(), SUPPLIERS);
        assert!(cause.is_missing());
        assert_eq!(engine.dataset().inventory.len(), 5);
        assert_eq!(engine.dataset().inventory[0].product_name, "Milk");
    }

    #[tokio::test]
    async fn test_malformed_row_falls_back_with_line() {
        let bad_sales = "product_id,timestamp,quantity_sold\nA1,2024-01-30 09:00:00,4\nA1,yesterday,2\n";
        let dir = setup_data_dir(&[(INVENTORY, INVENTORY_CSV), (SALES, bad_sales), (SUPPLIERS, SUPPLIERS_CSV)]);
        let engine = load_from(dir.path()).await;

        match engine.status().cause() {
            Some(LoadError::Malformed { resource, line, reason }) => {
                assert_eq!(resource, SALES);
                assert_eq!(*line, 3);
                assert!(reason.contains("timestamp"));
            }
            other => panic!("unexpected cause: {other:?}"),
        }
        assert_eq!(engine.dataset().suppliers[0].supplier_name, "Fresh Farms Co.");
    }

    #[tokio::test]
    async fn test_header_only_resource_is_empty_not_fallback() {
        let dir = setup_data_dir(&[
            (INVENTORY, INVENTORY_CSV),
            (SALES, "product_id,timestamp,quantity_sold\n"),
            (SUPPLIERS, SUPPLIERS_CSV),
        ]);
        let engine = load_from(dir.path()).await;

        assert!(!engine.status().is_fallback());
        assert!(engine.dataset().sales.is_empty());
        assert_eq!(engine.total_sales(), 0.0);
    }

    #[tokio::test]
    async fn test_crlf_and_blank_lines_accepted() {
        let suppliers = SUPPLIERS_CSV.replace('\n', "\r\n") + "\r\n\r\n";
        let dir = setup_data_dir(&[(INVENTORY, INVENTORY_CSV), (SALES, SALES_CSV), (SUPPLIERS, &suppliers)]);
        let engine = load_from(dir.path()).await;

        assert!(!engine.status().is_fallback());
        assert_eq!(engine.supplier_count(), 2);
        assert_eq!(engine.dataset().suppliers[1].phone, "+1-555-0302");
    }

    // ==================== METRICS ====================

    #[tokio::test]
    async fn test_metrics_from_files() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;
        let now = feb_first();

        assert!((engine.total_sales() - 57.0).abs() < 1e-9);
        assert!((engine.total_inventory_value() - 3020.0).abs() < 1e-9);
        assert_eq!(engine.sustainable_supplier_count(), 1);
        assert_eq!(engine.average_supplier_rating(), 4.0);

        let expiring = engine.expiring_products_at(now);
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].item.product_id, "A1");
        assert_eq!(expiring[0].days_to_expiry, 4);
        assert!((expiring[0].avg_daily_sales_last_30d - 0.2).abs() < 1e-9);
        assert_eq!(expiring[0].risk_score, 100.0);

        assert_eq!(engine.predicted_waste_value_at(now), 20.0);
        assert_eq!(engine.total_items_at_risk_at(now), 20);
        assert_eq!(engine.high_stock_risk_products()[0].product_id, "A2");
    }

    #[tokio::test]
    async fn test_supplier_risk_from_files() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;
        let metrics = engine.supplier_metrics_at(feb_first());

        assert_eq!(metrics.len(), 2);
        // Reliability 4.5, two-day delivery, all stock expiring
        assert!((metrics[0].risk_score - (3.0 + 20.0 / 7.0 + 50.0)).abs() < 1e-9);
        // Reliability 3.5, delivery at the 14-day cap, nothing expiring
        assert!((metrics[1].risk_score - 29.0).abs() < 1e-9);
        assert_eq!(metrics[1].expiry_risk_value, 0.0);
    }

    // ==================== PAGES ====================

    #[tokio::test]
    async fn test_waste_page_from_files() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;
        let view = waste::build(&engine, feb_first());

        assert_eq!(view.predicted_waste_value, "$20");
        assert_eq!(view.alerts.len(), 3);
        assert!(view.alerts[0].headline.starts_with("URGENT: 1 products"));
        assert_eq!(view.alerts[1].products, vec!["Headphones"]);
        // Headphones are watched for 90 days but expire in 20 months.
        assert_eq!(view.predicted_at_risk.len(), 1);
        assert_eq!(view.predicted_at_risk[0].item.product_id, "A1");
        assert!(!view.notice.fallback);
    }

    #[tokio::test]
    async fn test_energy_schedule_follows_sales_hours() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;
        let view = energy::build(&engine, 30);

        assert_eq!(view.schedule[9].setting, PowerSetting::FullPower);
        assert_eq!(view.schedule[18].setting, PowerSetting::FullPower);
        assert_eq!(view.schedule[15].setting, PowerSetting::ReducedPower);
        assert_eq!(view.schedule[23].setting, PowerSetting::MinimalOff);
        assert_eq!(view.adjustment.consumption_kwh, 3485);
        assert_eq!(view.cards[1].value, "26%");
    }

    #[tokio::test]
    async fn test_seasonal_and_supplier_pages_from_files() {
        let dir = full_data_dir();
        let engine = load_from(dir.path()).await;

        let season = seasonal::build(&engine, feb_first());
        let winter = season.season_totals.iter().find(|t| t.season == "Winter").unwrap();
        assert_eq!(winter.units_sold, 7);
        assert_eq!(season.charts[2].series[0].data[0], 7.0);
        // No lot peaks above 1.2 and seven units sold against 170 held.
        assert_eq!(season.efficiency.value, "85/100");
        assert_eq!(season.forecast.len(), 6);

        let supplier = suppliers::build(&engine, feb_first());
        assert_eq!(supplier.cards[2].value, "4.0/5");
        assert_eq!(supplier.cards[2].source, MetricSource::Computed);
        let summary = supplier.summary.unwrap();
        assert_eq!((summary.moderate_risk_suppliers, summary.low_risk_suppliers), (1, 1));
        assert_eq!(supplier.recommendations.len(), 1);
        assert_eq!(supplier.recommendations[0].subject, "Valley Dairy");
    }

    #[tokio::test]
    async fn test_fallback_notice_on_every_page() {
        let dir = setup_data_dir(&[]);
        let service = Arc::new(DataService::new(DirectorySource::new(dir.path())));
        let nav = Navigator::new(service, setup_test_db());

        for page in Page::ALL {
            let notice = match nav.navigate(page).await {
                PageView::Dashboard(v) => v.notice,
                PageView::WastePrediction(v) => v.notice,
                PageView::EnergyOptimization(v) => v.notice,
                PageView::GreenScore(v) => v.notice,
                PageView::SupplierAnalytics(v) => v.notice,
                PageView::SeasonalAnalytics(v) => v.notice,
                PageView::Error(v) => panic!("{page} rendered an error: {}", v.message),
            };
            assert!(notice.fallback);
            assert!(notice.message.unwrap().contains("inventory"));
        }
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_files() {
        let dir = setup_data_dir(&[(INVENTORY, INVENTORY_CSV), (SALES, SALES_CSV)]);
        let service = DataService::new(DirectorySource::new(dir.path()));
        assert!(service.load().await.status().is_fallback());

        fs::write(dir.path().join("suppliers.csv"), SUPPLIERS_CSV).unwrap();
        // A plain load keeps the cached snapshot
        assert!(service.load().await.status().is_fallback());

        let reloaded = service.reload().await;
        assert!(!reloaded.status().is_fallback());
        assert_eq!(reloaded.supplier_count(), 2);
    }

    #[tokio::test]
    async fn test_relative_data_dir_resolves_against_app_dir() {
        let app_dir = TempDir::new().unwrap();
        let data = app_dir.path().join("data");
        fs::create_dir(&data).unwrap();
        for (resource, text) in [(INVENTORY, INVENTORY_CSV), (SALES, SALES_CSV), (SUPPLIERS, SUPPLIERS_CSV)] {
            fs::write(data.join(format!("{resource}.csv")), text).unwrap();
        }

        let service = DataService::from_config(&AppConfig::default(), app_dir.path());
        let engine = service.load().await;

        assert!(!engine.status().is_fallback());
        assert_eq!(engine.dataset().inventory[0].product_name, "Yogurt");
    }

    // ==================== PREFERENCES ====================

    #[tokio::test]
    async fn test_energy_page_reads_stored_slider() {
        let dir = full_data_dir();
        let db = setup_test_db();
        db.set_off_peak_percentage(90).unwrap();
        let nav = Navigator::new(Arc::new(DataService::new(DirectorySource::new(dir.path()))), Arc::clone(&db));

        match nav.navigate(Page::EnergyOptimization).await {
            PageView::EnergyOptimization(view) => {
                assert_eq!(view.slider.value, 90);
                assert_eq!(view.cards[0].value, "2255 kWh");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_preferences_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let path = config.database_path(dir.path());

        {
            let db = Database::open(&path).unwrap();
            db.initialize().unwrap();
            db.set_off_peak_percentage(35).unwrap();
        }

        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.off_peak_percentage().unwrap(), 35);
    }
}
