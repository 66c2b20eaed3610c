//! Page state machine. The only app-wide mutable state is which page is showing.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::commands::dashboard::{self, DashboardView};
use crate::commands::energy::{self, EnergyView};
use crate::commands::green_score::{self, GreenScoreView};
use crate::commands::seasonal::{self, SeasonalView};
use crate::commands::suppliers::{self, SupplierView};
use crate::commands::waste::{self, WasteView};
use crate::db::Database;
use crate::error::{DashboardError, Result};
use crate::service::DataService;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Dashboard,
    WastePrediction,
    EnergyOptimization,
    GreenScore,
    SupplierAnalytics,
    SeasonalAnalytics,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::WastePrediction,
        Page::EnergyOptimization,
        Page::GreenScore,
        Page::SupplierAnalytics,
        Page::SeasonalAnalytics,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::WastePrediction => "waste-prediction",
            Page::EnergyOptimization => "energy-optimization",
            Page::GreenScore => "green-score",
            Page::SupplierAnalytics => "supplier-analytics",
            Page::SeasonalAnalytics => "seasonal-analytics",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::WastePrediction => "Waste Prediction",
            Page::EnergyOptimization => "Energy Optimization",
            Page::GreenScore => "Green Score",
            Page::SupplierAnalytics => "Supplier Analytics",
            Page::SeasonalAnalytics => "Seasonal Analytics",
        }
    }

    /// Id of the element the page renders into.
    pub fn container_id(self) -> String {
        format!("{}-container", self.slug())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Page::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| DashboardError::UnknownPage(s.to_string()))
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorView {
    pub title: String,
    pub message: String,
    /// Action the reload button triggers.
    pub action: String,
}

impl ErrorView {
    fn new(err: &DashboardError) -> Self {
        Self {
            title: "Error Loading Dashboard".to_string(),
            message: format!("Failed to load data: {err}"),
            action: "reload".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "page", content = "view", rename_all = "kebab-case")]
pub enum PageView {
    Dashboard(DashboardView),
    WastePrediction(WasteView),
    EnergyOptimization(EnergyView),
    GreenScore(GreenScoreView),
    SupplierAnalytics(SupplierView),
    SeasonalAnalytics(SeasonalView),
    Error(ErrorView),
}

/// Maps navigation events to freshly built page views.
///
/// Every navigation builds the page again from the shared [`DataService`] snapshot; nothing from
/// a previous render is reused.
pub struct Navigator {
    service: Arc<DataService>,
    db: Arc<Database>,
    current: Mutex<Page>,
}

impl Navigator {
    pub fn new(service: Arc<DataService>, db: Arc<Database>) -> Self {
        Self {
            service,
            db,
            current: Mutex::new(Page::default()),
        }
    }

    pub fn current(&self) -> Page {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn service(&self) -> &Arc<DataService> {
        &self.service
    }

    /// Makes `page` current and renders it. A failed render becomes an error page.
    pub async fn navigate(&self, page: Page) -> PageView {
        *self.current.lock().unwrap_or_else(|p| p.into_inner()) = page;
        debug!(%page, "navigating");

        match self.render(page).await {
            Ok(view) => view,
            Err(e) => {
                error!(%page, error = %e, "failed to render page");
                PageView::Error(ErrorView::new(&e))
            }
        }
    }

    /// Like [`Navigator::navigate`] but takes a page slug; unknown slugs leave the current page alone.
    pub async fn navigate_to(&self, slug: &str) -> PageView {
        match slug.parse::<Page>() {
            Ok(page) => self.navigate(page).await,
            Err(e) => PageView::Error(ErrorView::new(&e)),
        }
    }

    pub async fn render(&self, page: Page) -> Result<PageView> {
        let engine = self.service.load().await;
        let now = Utc::now();

        Ok(match page {
            Page::Dashboard => PageView::Dashboard(dashboard::build(&engine)),
            Page::WastePrediction => PageView::WastePrediction(waste::build(&engine, now)),
            Page::EnergyOptimization => {
                let percentage = self.db.off_peak_percentage()?;
                PageView::EnergyOptimization(energy::build(&engine, percentage))
            }
            Page::GreenScore => PageView::GreenScore(green_score::build(&engine)),
            Page::SupplierAnalytics => PageView::SupplierAnalytics(suppliers::build(&engine, now)),
            Page::SeasonalAnalytics => PageView::SeasonalAnalytics(seasonal::build(&engine, now)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemorySource;

    fn navigator() -> Navigator {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        Navigator::new(Arc::new(DataService::new(MemorySource::new())), Arc::new(db))
    }

    #[test]
    fn test_slugs_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.slug().parse::<Page>().unwrap(), page);
        }
        assert_eq!(Page::GreenScore.container_id(), "green-score-container");
        assert!(matches!("settings".parse::<Page>(), Err(DashboardError::UnknownPage(_))));
    }

    #[tokio::test]
    async fn test_starts_on_dashboard_and_tracks_navigation() {
        let nav = navigator();
        assert_eq!(nav.current(), Page::Dashboard);

        let view = nav.navigate(Page::SupplierAnalytics).await;
        assert!(matches!(view, PageView::SupplierAnalytics(_)));
        assert_eq!(nav.current(), Page::SupplierAnalytics);
    }

    #[tokio::test]
    async fn test_unknown_slug_renders_error_and_keeps_page() {
        let nav = navigator();
        nav.navigate(Page::GreenScore).await;

        match nav.navigate_to("settings").await {
            PageView::Error(view) => {
                assert_eq!(view.action, "reload");
                assert!(view.message.contains("settings"));
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(nav.current(), Page::GreenScore);
    }

    #[tokio::test]
    async fn test_every_page_renders() {
        let nav = navigator();
        for page in Page::ALL {
            assert!(!matches!(nav.navigate(page).await, PageView::Error(_)), "{page} failed");
        }
    }

    #[tokio::test]
    async fn test_pages_share_one_snapshot() {
        let nav = navigator();
        nav.navigate(Page::Dashboard).await;
        let first = nav.service().engine().await.unwrap();
        nav.navigate(Page::WastePrediction).await;
        let second = nav.service().engine().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_view_serializes_with_page_tag() {
        let nav = navigator();
        let json = serde_json::to_value(nav.navigate(Page::GreenScore).await).unwrap();

        assert_eq!(json["page"], "green-score");
        assert_eq!(json["view"]["overall"]["value"], "82");
        assert_eq!(json["view"]["overall"]["source"], "constant");

        let error = serde_json::to_value(nav.navigate_to("nowhere").await).unwrap();
        assert_eq!(error["page"], "error");
        assert_eq!(error["view"]["action"], "reload");
    }
}
