use tauri::State;

use crate::navigation::{Navigator, Page, PageView};

#[tauri::command]
pub async fn navigate(navigator: State<'_, Navigator>, page: String) -> Result<PageView, String> {
    Ok(navigator.navigate_to(&page).await)
}

#[tauri::command]
pub fn current_page(navigator: State<'_, Navigator>) -> Page {
    navigator.current()
}

/// Reads every data file again, then re-renders the current page from the new snapshot.
#[tauri::command]
pub async fn reload_data(navigator: State<'_, Navigator>) -> Result<PageView, String> {
    navigator.service().reload().await;
    Ok(navigator.navigate(navigator.current()).await)
}
