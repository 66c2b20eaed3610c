//! Lighting and HVAC schedule from footfall inferred out of sales timestamps.

use crate::models::{PowerSetting, ScheduleSlot};

pub const STORE_OPEN_HOUR: u32 = 8;
pub const STORE_CLOSE_HOUR: u32 = 22;
pub const PEAK_THRESHOLD_FACTOR: f64 = 0.7;
/// Load of lighting plus AC at full power, in kW.
pub const BASE_LOAD_KW: f64 = 10.0;
pub const COST_PER_KWH: f64 = 0.15;
const MINIMAL_LOAD_FACTOR: f64 = 0.1;

fn is_open(hour: u32) -> bool {
    (STORE_OPEN_HOUR..STORE_CLOSE_HOUR).contains(&hour)
}

/// Full power in busy opening hours, reduced power in quiet ones, minimal while closed.
///
/// An hour is busy when its footfall reaches 70% of the busiest opening hour.
pub fn recommend(footfall: &[u32; 24]) -> Vec<ScheduleSlot> {
    let peak = (STORE_OPEN_HOUR..STORE_CLOSE_HOUR)
        .map(|h| footfall[h as usize])
        .max()
        .unwrap_or(0);
    let threshold = f64::from(peak) * PEAK_THRESHOLD_FACTOR;

    (0..24u32)
        .map(|hour| {
            let visits = footfall[hour as usize];
            let setting = if !is_open(hour) {
                PowerSetting::MinimalOff
            } else if f64::from(visits) >= threshold {
                PowerSetting::FullPower
            } else {
                PowerSetting::ReducedPower
            };
            ScheduleSlot {
                hour,
                setting,
                footfall: visits,
            }
        })
        .collect()
}

/// Daily (kWh, cost) saved by `schedule` against running at full power around the clock.
pub fn daily_savings(schedule: &[ScheduleSlot], reduction_pct: u8) -> (f64, f64) {
    let standard = BASE_LOAD_KW * 24.0;
    let reduced = BASE_LOAD_KW * (1.0 - f64::from(reduction_pct) / 100.0);
    let optimized: f64 = schedule
        .iter()
        .map(|slot| match slot.setting {
            PowerSetting::FullPower => BASE_LOAD_KW,
            PowerSetting::ReducedPower => reduced,
            PowerSetting::MinimalOff => BASE_LOAD_KW * MINIMAL_LOAD_FACTOR,
        })
        .sum();
    let saved = standard - optimized;
    (saved, saved * COST_PER_KWH)
}
