use serde::Serialize;

use super::{card, chart, series, DataNotice, MONTHS};
use crate::metrics::{MetricId, MetricsEngine};
use crate::models::{ChartKind, ChartSpec, MetricCard};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GreenScoreView {
    pub notice: DataNotice,
    pub overall: MetricCard,
    pub components: Vec<MetricCard>,
    pub charts: Vec<ChartSpec>,
}

pub fn build(engine: &MetricsEngine) -> GreenScoreView {
    GreenScoreView {
        notice: DataNotice::from_status(engine.status()),
        overall: card(MetricId::GreenScore, "Overall Green Score", engine.green_score().to_string()),
        components: vec![
            card(MetricId::WasteScore, "Waste Management", engine.waste_score().to_string()),
            card(MetricId::EnergyScore, "Energy Efficiency", engine.energy_score().to_string()),
            card(MetricId::SourcingScore, "Sustainable Sourcing", engine.sourcing_score().to_string()),
            card(MetricId::CarbonScore, "Carbon Footprint", engine.carbon_score().to_string()),
        ],
        charts: vec![
            chart(
                "greenScoreTrendChart",
                ChartKind::Line,
                &MONTHS[..6],
                vec![series("Green Score", &[65u32, 68, 72, 75, 78, 82])],
            ),
            chart(
                "greenScoreBreakdownChart",
                ChartKind::Doughnut,
                &["Waste Management", "Energy Efficiency", "Sustainable Sourcing", "Carbon Footprint"],
                vec![series("Weight", &[25u32, 30, 25, 20])],
            ),
        ],
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_green_score(app: tauri::AppHandle) -> Result<GreenScoreView, String> {
    use crate::service::DataServiceExt;

    let engine = app.data().load().await;
    Ok(build(&engine))
}
