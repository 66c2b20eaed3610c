use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{card, chart, money, series, DataNotice, MONTHS};
use crate::metrics::{MetricId, MetricsEngine};
use crate::models::{ChartKind, ChartSpec, InventoryItem, ItemInsight, MetricCard};

/// How many lots each alert lists.
const ALERT_PREVIEW: usize = 3;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Alert {
    pub headline: String,
    pub count: usize,
    pub products: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WasteView {
    pub notice: DataNotice,
    pub cards: Vec<MetricCard>,
    pub threshold_summary: String,
    pub at_risk: Vec<ItemInsight>,
    /// Lots the prediction model expects to go to waste, riskiest first.
    pub predicted_at_risk: Vec<ItemInsight>,
    pub predicted_waste_value: String,
    pub total_items_at_risk: u64,
    pub alerts: Vec<Alert>,
    pub charts: Vec<ChartSpec>,
}

fn threshold_of(engine: &MetricsEngine, label: &str) -> u32 {
    engine
        .expiry_thresholds()
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, days)| *days)
        .unwrap_or_default()
}

fn alert<'a>(headline: String, names: impl Iterator<Item = &'a InventoryItem>, count: usize) -> Option<Alert> {
    (count > 0).then(|| Alert {
        headline,
        count,
        products: names.take(ALERT_PREVIEW).map(|i| i.product_name.clone()).collect(),
    })
}

pub fn build(engine: &MetricsEngine, now: DateTime<Utc>) -> WasteView {
    let at_risk = engine.expiring_products_at(now);
    let critical = engine.critical_expiring_products_at(now);
    let overstock = engine.high_stock_risk_products();
    let zero_sales = engine.zero_sales_products_at(now);

    let alerts = [
        alert(
            format!("URGENT: {} products expiring within 7 days!", critical.len()),
            critical.iter().map(|i| &i.item),
            critical.len(),
        ),
        alert(
            format!("OVERSTOCK ALERT: {} products with excessive stock levels!", overstock.len()),
            overstock.iter().copied(),
            overstock.len(),
        ),
        alert(
            format!("NO SALES ALERT: {} products with zero sales in 30 days!", zero_sales.len()),
            zero_sales.iter().map(|i| &i.item),
            zero_sales.len(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    WasteView {
        notice: DataNotice::from_status(engine.status()),
        cards: vec![
            card(MetricId::PredictedWasteKg, "Predicted Waste", format!("{}kg", engine.predicted_waste_kg())),
            card(MetricId::PredictionAccuracy, "Accuracy Rate", format!("{}%", engine.prediction_accuracy())),
            card(MetricId::WasteCostSavings, "Cost Savings", money(f64::from(engine.waste_cost_savings()))),
            card(
                MetricId::WasteOptimizationScore,
                "Optimization Score",
                format!("{}/100", engine.waste_optimization_score()),
            ),
        ],
        threshold_summary: format!(
            "Auto: Critical {}d, Moderate {}d, Low {}d",
            threshold_of(engine, "Shelf Life"),
            threshold_of(engine, "Warranty Period"),
            threshold_of(engine, "Quality Period"),
        ),
        predicted_waste_value: money(engine.predicted_waste_value_at(now)),
        total_items_at_risk: engine.total_items_at_risk_at(now),
        at_risk,
        predicted_at_risk: engine.predicted_at_risk_at(now),
        alerts,
        charts: vec![
            chart(
                "wasteTrendChart",
                ChartKind::Line,
                &MONTHS[..6],
                vec![
                    series("Actual Waste", &[120u32, 135, 110, 125, 140, 130]),
                    series("Predicted Waste", &[115u32, 130, 105, 120, 135, 125]),
                ],
            ),
            chart(
                "wasteCategoryChart",
                ChartKind::Doughnut,
                &["Dairy", "Produce", "Bakery", "Meat", "Packaged"],
                vec![series("Waste by Category", &[30u32, 25, 20, 15, 10])],
            ),
        ],
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_waste_prediction(app: tauri::AppHandle) -> Result<WasteView, String> {
    use crate::service::DataServiceExt;

    let engine = app.data().load().await;
    Ok(build(&engine, Utc::now()))
}
