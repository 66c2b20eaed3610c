//! Off-peak slider persistence.

use crate::db::DatabaseExt;
use crate::energy::OffPeakAdjustment;
use crate::service::DataServiceExt;

#[tauri::command]
pub fn get_off_peak_percentage(app: tauri::AppHandle) -> Result<u8, String> {
    app.db().off_peak_percentage().map_err(|e| e.to_string())
}

/// Stores the slider value and returns the energy figures it produces.
#[tauri::command]
pub async fn set_off_peak_percentage(app: tauri::AppHandle, percentage: u8) -> Result<OffPeakAdjustment, String> {
    app.db()
        .set_off_peak_percentage(percentage)
        .map_err(|e| e.to_string())?;

    let engine = app.data().load().await;
    Ok(OffPeakAdjustment::new(engine.energy_consumption(), percentage))
}
