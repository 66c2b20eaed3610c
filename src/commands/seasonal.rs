use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{card, chart, series, DataNotice, MONTHS};
use crate::metrics::{MetricId, MetricsEngine, FORECAST_MONTHS};
use crate::models::{ChartKind, ChartSeries, ChartSpec, DemandForecast, MetricCard, Recommendation};

const CATEGORIES: [&str; 6] = ["Dairy", "Produce", "Bakery", "Meat", "Beverages", "Snacks"];

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SeasonTotal {
    pub season: String,
    pub units_sold: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SeasonalView {
    pub notice: DataNotice,
    pub cards: Vec<MetricCard>,
    pub season_totals: Vec<SeasonTotal>,
    pub efficiency: MetricCard,
    /// Category demand for the coming months, month by month.
    pub forecast: Vec<DemandForecast>,
    pub recommendations: Vec<Recommendation>,
    pub charts: Vec<ChartSpec>,
}

fn units(label: &str, data: &[u64]) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        data: data.iter().map(|v| *v as f64).collect(),
    }
}

/// One bar series per forecast month over the inventory categories.
fn forecast_chart(forecast: &[DemandForecast]) -> ChartSpec {
    let mut categories: Vec<&str> = Vec::new();
    let mut months: Vec<u32> = Vec::new();
    for row in forecast {
        if !categories.contains(&row.category.as_str()) {
            categories.push(&row.category);
        }
        if !months.contains(&row.month) {
            months.push(row.month);
        }
    }

    let series = months
        .iter()
        .map(|month| ChartSeries {
            label: MONTHS[(*month as usize - 1) % 12].to_string(),
            data: forecast
                .iter()
                .filter(|row| row.month == *month)
                .map(|row| (row.forecasted_sales * 10.0).round() / 10.0)
                .collect(),
        })
        .collect();
    chart("demandForecastChart", ChartKind::Bar, &categories, series)
}

pub fn build(engine: &MetricsEngine, now: DateTime<Utc>) -> SeasonalView {
    let seasons = engine.seasonal_sales();
    let season_names: Vec<&str> = seasons.iter().map(|(s, _)| s.name()).collect();
    let season_units: Vec<u64> = seasons.iter().map(|(_, n)| *n).collect();
    let forecast = engine.demand_forecast_at(now, FORECAST_MONTHS);

    SeasonalView {
        notice: DataNotice::from_status(engine.status()),
        cards: vec![
            card(MetricId::PeakSeason, "Peak Season", engine.peak_season()),
            card(MetricId::SeasonalGrowth, "Seasonal Growth", format!("+{}%", engine.seasonal_growth())),
            card(MetricId::ForecastAccuracy, "Forecast Accuracy", format!("{}%", engine.forecast_accuracy())),
            card(MetricId::InventoryTurnover, "Inventory Turnover", format!("{}x", engine.inventory_turnover())),
        ],
        season_totals: seasons
            .iter()
            .map(|(season, n)| SeasonTotal {
                season: season.name().to_string(),
                units_sold: *n,
            })
            .collect(),
        efficiency: card(
            MetricId::SeasonalEfficiency,
            "Seasonal Efficiency",
            format!("{}/100", engine.seasonal_efficiency_score_at(now)),
        ),
        recommendations: engine.seasonal_recommendations_at(now),
        charts: vec![
            chart(
                "seasonalTrendChart",
                ChartKind::Line,
                &MONTHS,
                vec![series(
                    "Sales Volume",
                    &[120u32, 135, 150, 165, 180, 200, 220, 210, 190, 175, 160, 140],
                )],
            ),
            chart(
                "seasonalSalesChart",
                ChartKind::Bar,
                &season_names,
                vec![units("Units Sold", &season_units)],
            ),
            chart(
                "monthlySalesChart",
                ChartKind::Bar,
                &MONTHS,
                vec![units("Units Sold", &engine.monthly_sales())],
            ),
            chart(
                "categoryPerformanceChart",
                ChartKind::Radar,
                &CATEGORIES,
                vec![
                    series("Spring", &[80u32, 90, 85, 75, 70, 80]),
                    series("Summer", &[85u32, 95, 80, 70, 95, 85]),
                    series("Fall", &[90u32, 85, 90, 85, 75, 90]),
                    series("Winter", &[95u32, 80, 95, 90, 80, 95]),
                ],
            ),
            forecast_chart(&forecast),
        ],
        forecast,
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_seasonal_analytics(app: tauri::AppHandle) -> Result<SeasonalView, String> {
    use crate::service::DataServiceExt;

    let engine = app.data().load().await;
    Ok(build(&engine, Utc::now()))
}
