use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryTier {
    Critical,
    Moderate,
    Low,
}

impl ExpiryTier {
    /// Classifies a free-form expiry label. Unknown labels fall into the low tier.
    pub fn classify(label: &str) -> Self {
        match label.trim() {
            "Shelf Life" | "Expiration Date" | "Perishable" => Self::Critical,
            "Warranty Period" | "Fashion Season" => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::Moderate => 0.7,
            Self::Low => 0.4,
        }
    }

    /// A predicted lot must score above this to be reported.
    pub fn risk_cutoff(self) -> f64 {
        match self {
            Self::Critical => 30.0,
            Self::Moderate => 50.0,
            Self::Low => 70.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InventoryItem {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub supplier_id: String,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub expiry_type: String,
    pub quantity_in_stock: u32,
    pub cost_price: f64,
    pub selling_price: f64,
    pub seasonal_demand_factor: f64,
}

impl InventoryItem {
    pub fn expiry_tier(&self) -> ExpiryTier {
        ExpiryTier::classify(&self.expiry_type)
    }

    /// Whole days from `now` until the lot expires, rounded up. Negative once expired.
    pub fn days_to_expiry(&self, now: DateTime<Utc>) -> i64 {
        const DAY_MS: i64 = 24 * 60 * 60 * 1000;
        let expires_at = self.expiry_date.and_time(chrono::NaiveTime::MIN).and_utc();
        let ms = (expires_at - now).num_milliseconds();
        ms.div_euclid(DAY_MS) + i64::from(ms.rem_euclid(DAY_MS) > 0)
    }

    pub fn stock_cost(&self) -> f64 {
        f64::from(self.quantity_in_stock) * self.cost_price
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SalesRecord {
    pub product_id: String,
    pub timestamp: NaiveDateTime,
    pub quantity_sold: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Supplier {
    pub supplier_id: String,
    pub supplier_name: String,
    pub reliability_score: f64,
    pub delivery_time_days: u32,
    pub contact_email: String,
    pub phone: String,
}

/// The three record sets, loaded together.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Dataset {
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<SalesRecord>,
    pub suppliers: Vec<Supplier>,
}

/// An inventory lot with its on-demand derived figures.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ItemInsight {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub days_to_expiry: i64,
    pub avg_daily_sales_last_30d: f64,
    pub estimated_days_stock_left: f64,
    pub risk_score: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SupplierMetrics {
    pub supplier_id: String,
    pub supplier_name: String,
    pub total_products: usize,
    pub total_inventory_value: f64,
    pub expiry_risk_value: f64,
    pub reliability_score: f64,
    pub delivery_time_days: u32,
    pub risk_score: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SupplierSummary {
    pub total_suppliers: usize,
    pub avg_reliability_score: f64,
    pub avg_delivery_time_days: f64,
    pub total_inventory_value: f64,
    pub total_expiry_risk_value: f64,
    pub high_risk_suppliers: usize,
    pub moderate_risk_suppliers: usize,
    pub low_risk_suppliers: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// An action suggested for one supplier or category.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Recommendation {
    pub subject: String,
    pub issue: String,
    pub message: String,
    pub priority: Priority,
}

/// Expected units sold for one category in one upcoming month.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DemandForecast {
    pub category: String,
    pub month: u32,
    pub season: Season,
    pub daily_rate: f64,
    pub forecasted_sales: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// Derived from the loaded records.
    Computed,
    /// A fixed figure, independent of the data.
    Constant,
    /// Stands in for a calculation that does not exist yet.
    Placeholder,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub source: MetricSource,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Radar,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
}

/// What a chart needs to be drawn: category labels and one or more numeric series.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerSetting {
    FullPower,
    ReducedPower,
    MinimalOff,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ScheduleSlot {
    pub hour: u32,
    pub setting: PowerSetting,
    pub footfall: u32,
}
