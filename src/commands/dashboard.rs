use serde::Serialize;

use super::{card, money, DataNotice};
use crate::metrics::{MetricId, MetricsEngine};
use crate::models::MetricCard;
use crate::navigation::Page;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FeatureLink {
    pub title: String,
    pub summary: String,
    pub page: Page,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct InventoryOverview {
    pub products: usize,
    pub sales_records: usize,
    pub suppliers: usize,
    pub inventory_value: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DashboardView {
    pub notice: DataNotice,
    pub cards: Vec<MetricCard>,
    pub overview: InventoryOverview,
    pub features: Vec<FeatureLink>,
}

fn feature(page: Page, summary: &str) -> FeatureLink {
    FeatureLink {
        title: page.title().to_string(),
        summary: summary.to_string(),
        page,
    }
}

pub fn build(engine: &MetricsEngine) -> DashboardView {
    let data = engine.dataset();

    DashboardView {
        notice: DataNotice::from_status(engine.status()),
        cards: vec![
            card(MetricId::TotalSales, "Total Sales", money(engine.total_sales())),
            card(MetricId::WasteReduction, "Waste Reduction", format!("{}%", engine.waste_reduction())),
            card(MetricId::EnergySavings, "Energy Savings", format!("{}%", engine.energy_savings())),
            card(MetricId::GreenScore, "Green Score", format!("{}/100", engine.green_score())),
        ],
        overview: InventoryOverview {
            products: data.inventory.len(),
            sales_records: data.sales.len(),
            suppliers: engine.supplier_count(),
            inventory_value: money(engine.total_inventory_value()),
        },
        features: vec![
            feature(Page::WastePrediction, "Spot lots that will expire before they sell"),
            feature(Page::EnergyOptimization, "Tune lighting and HVAC to footfall"),
            feature(Page::GreenScore, "Track the store's sustainability rating"),
            feature(Page::SupplierAnalytics, "Compare supplier reliability and risk"),
            feature(Page::SeasonalAnalytics, "Plan stock around seasonal demand"),
        ],
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_dashboard(app: tauri::AppHandle) -> Result<DashboardView, String> {
    use crate::service::DataServiceExt;

    let engine = app.data().load().await;
    Ok(build(&engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSource;
    use crate::sample;

    #[test]
    fn test_dashboard_cards() {
        let view = build(&MetricsEngine::from_dataset(sample::dataset()));

        assert_eq!(view.cards[0].value, "$35.41");
        assert_eq!(view.cards[0].source, MetricSource::Computed);
        assert_eq!(view.cards[3].value, "82/100");
        assert_eq!(view.cards[3].source, MetricSource::Constant);
        assert_eq!(view.overview.inventory_value, "$592.5");
        assert!(!view.notice.fallback);
    }
}
