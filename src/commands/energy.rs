use serde::Serialize;

use super::{card, chart, money, series, DataNotice, MONTHS};
use crate::energy::{OffPeakAdjustment, MAX_OFF_PEAK_PCT, MIN_OFF_PEAK_PCT};
use crate::metrics::{MetricId, MetricsEngine};
use crate::models::{ChartKind, ChartSpec, MetricCard, ScheduleSlot};
use crate::schedule;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Slider {
    pub min: u8,
    pub max: u8,
    pub value: u8,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnergyView {
    pub notice: DataNotice,
    pub slider: Slider,
    pub adjustment: OffPeakAdjustment,
    pub cards: Vec<MetricCard>,
    pub schedule: Vec<ScheduleSlot>,
    pub daily_kwh_saved: f64,
    pub daily_cost_saved: String,
    pub charts: Vec<ChartSpec>,
}

pub fn build(engine: &MetricsEngine, percentage: u8) -> EnergyView {
    let adjustment = OffPeakAdjustment::new(engine.energy_consumption(), percentage);
    let footfall = engine.footfall_by_hour();
    let slots = schedule::recommend(&footfall);
    let (kwh_saved, cost_saved) = schedule::daily_savings(&slots, adjustment.percentage);
    let hours: Vec<String> = (0..24).map(|h| format!("{h}:00")).collect();
    let hour_labels: Vec<&str> = hours.iter().map(String::as_str).collect();

    EnergyView {
        notice: DataNotice::from_status(engine.status()),
        slider: Slider {
            min: MIN_OFF_PEAK_PCT,
            max: MAX_OFF_PEAK_PCT,
            value: adjustment.percentage,
        },
        cards: vec![
            card(
                MetricId::EnergyConsumption,
                "Energy Consumption",
                format!("{} kWh", adjustment.consumption_kwh),
            ),
            card(MetricId::EnergySavings, "Energy Savings", format!("{}%", adjustment.savings_pct)),
            card(MetricId::EnergyCostSavings, "Cost Savings", money(f64::from(adjustment.cost_savings))),
            card(
                MetricId::EnergyEfficiencyScore,
                "Efficiency Score",
                format!("{}/100", adjustment.efficiency_score),
            ),
        ],
        adjustment,
        schedule: slots,
        daily_kwh_saved: kwh_saved,
        daily_cost_saved: money(cost_saved),
        charts: vec![
            chart(
                "footfallChart",
                ChartKind::Bar,
                &hour_labels,
                vec![series("Footfall (Visits)", &footfall)],
            ),
            chart(
                "energyConsumptionChart",
                ChartKind::Line,
                &MONTHS[..6],
                vec![series("Energy Consumption (kWh)", &[4500u32, 4200, 4800, 4600, 4400, 4100])],
            ),
            chart(
                "energySystemChart",
                ChartKind::Doughnut,
                &["Lighting", "HVAC", "Refrigeration", "Equipment", "Other"],
                vec![series("Share of Consumption", &[25u32, 35, 20, 15, 5])],
            ),
        ],
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_energy_optimization(app: tauri::AppHandle) -> Result<EnergyView, String> {
    use crate::db::DatabaseExt;
    use crate::service::DataServiceExt;

    let percentage = app.db().off_peak_percentage().map_err(|e| e.to_string())?;
    let engine = app.data().load().await;
    Ok(build(&engine, percentage))
}
