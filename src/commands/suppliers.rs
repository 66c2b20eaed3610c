use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{card, chart, series, DataNotice};
use crate::metrics::{MetricId, MetricsEngine};
use crate::models::{ChartKind, ChartSeries, ChartSpec, MetricCard, Recommendation, SupplierMetrics, SupplierSummary};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SupplierView {
    pub notice: DataNotice,
    pub cards: Vec<MetricCard>,
    pub suppliers: Vec<SupplierMetrics>,
    pub summary: Option<SupplierSummary>,
    pub recommendations: Vec<Recommendation>,
    pub charts: Vec<ChartSpec>,
}

pub fn build(engine: &MetricsEngine, now: DateTime<Utc>) -> SupplierView {
    let suppliers = &engine.dataset().suppliers;
    let names: Vec<&str> = suppliers.iter().map(|s| s.supplier_name.as_str()).collect();
    let summary = engine.supplier_summary_at(now);
    let bands = summary.as_ref().map_or([0; 3], |s| {
        [s.low_risk_suppliers, s.moderate_risk_suppliers, s.high_risk_suppliers].map(|n| n as u32)
    });

    SupplierView {
        notice: DataNotice::from_status(engine.status()),
        cards: vec![
            card(MetricId::SupplierCount, "Total Suppliers", engine.supplier_count().to_string()),
            card(
                MetricId::SustainableSupplierCount,
                "Sustainable Suppliers",
                engine.sustainable_supplier_count().to_string(),
            ),
            card(
                MetricId::AverageSupplierRating,
                "Average Rating",
                format!("{:.1}/5", engine.average_supplier_rating()),
            ),
            card(MetricId::OnTimeDelivery, "On-Time Delivery", format!("{}%", engine.on_time_delivery_rate())),
        ],
        suppliers: engine.supplier_metrics_at(now),
        summary,
        recommendations: engine.supplier_recommendations_at(now),
        charts: vec![
            chart(
                "supplierPerformanceChart",
                ChartKind::Bar,
                &names,
                vec![ChartSeries {
                    label: "Reliability Score".to_string(),
                    data: suppliers.iter().map(|s| s.reliability_score).collect(),
                }],
            ),
            chart(
                "supplierSustainabilityChart",
                ChartKind::Doughnut,
                &["Certified Sustainable", "In Progress", "Not Certified"],
                vec![series("Suppliers", &[65u32, 25, 10])],
            ),
            chart(
                "supplierRiskChart",
                ChartKind::Bar,
                &["Low Risk", "Moderate Risk", "High Risk"],
                vec![series("Suppliers", &bands)],
            ),
        ],
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_supplier_analytics(app: tauri::AppHandle) -> Result<SupplierView, String> {
    use crate::service::DataServiceExt;

    let engine = app.data().load().await;
    Ok(build(&engine, Utc::now()))
}
