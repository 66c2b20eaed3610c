//! One module per page. Each builds a serializable view from a metrics snapshot and, with the
//! `desktop` feature, exposes it as a Tauri command.

pub mod dashboard;
pub mod energy;
pub mod green_score;
#[cfg(feature = "desktop")]
pub mod navigation;
#[cfg(feature = "desktop")]
pub mod preferences;
pub mod seasonal;
pub mod suppliers;
pub mod waste;

use serde::Serialize;

use crate::metrics::{LoadStatus, MetricId};
use crate::models::{ChartKind, ChartSeries, ChartSpec, MetricCard};

pub(crate) const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown on every page when the built-in sample replaced the live data.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DataNotice {
    pub fallback: bool,
    pub message: Option<String>,
}

impl DataNotice {
    pub fn from_status(status: &LoadStatus) -> Self {
        Self {
            fallback: status.is_fallback(),
            message: status
                .cause()
                .map(|e| format!("Showing sample data: {e}")),
        }
    }
}

pub(crate) fn card(id: MetricId, title: &str, value: impl Into<String>) -> MetricCard {
    MetricCard {
        title: title.to_string(),
        value: value.into(),
        source: id.source(),
    }
}

pub(crate) fn series<T: Into<f64> + Copy>(label: &str, data: &[T]) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        data: data.iter().map(|v| (*v).into()).collect(),
    }
}

pub(crate) fn chart(id: &str, kind: ChartKind, labels: &[&str], series: Vec<ChartSeries>) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        kind,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        series,
    }
}

/// `$1,234.5` style: thousands separated, cents only when present.
pub fn money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{sign}${grouped}"),
        f if f % 10 == 0 => format!("{sign}${grouped}.{}", f / 10),
        f => format!("{sign}${grouped}.{f:02}"),
    }
}
