//! Energy figures adjusted by the off-peak reduction slider.

use serde::Serialize;

pub const MIN_OFF_PEAK_PCT: u8 = 10;
pub const MAX_OFF_PEAK_PCT: u8 = 90;
pub const DEFAULT_OFF_PEAK_PCT: u8 = 50;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct OffPeakAdjustment {
    pub percentage: u8,
    pub consumption_kwh: u32,
    pub savings_pct: u32,
    pub cost_savings: u32,
    pub efficiency_score: u32,
}

impl OffPeakAdjustment {
    /// Derives the adjusted figures from `base_consumption_kwh` and a slider value, clamped to 10..=90.
    pub fn new(base_consumption_kwh: u32, percentage: u8) -> Self {
        let percentage = clamp_percentage(percentage);
        let pct = f64::from(percentage);
        let above_min = pct - f64::from(MIN_OFF_PEAK_PCT);

        Self {
            percentage,
            consumption_kwh: (f64::from(base_consumption_kwh) * (1.0 - pct / 200.0)).round() as u32,
            savings_pct: (10.0 + above_min * 0.8).round() as u32,
            cost_savings: (1000.0 + above_min * 30.0).round() as u32,
            efficiency_score: (60.0 + above_min * 0.4).round() as u32,
        }
    }
}

pub fn clamp_percentage(percentage: u8) -> u8 {
    percentage.clamp(MIN_OFF_PEAK_PCT, MAX_OFF_PEAK_PCT)
}
