//! Derived figures over one loaded dataset.
//!
//! Accessors come in two kinds that callers never need to tell apart: figures computed from the
//! records and fixed figures from [`figures`]. [`MetricId::source`] records which is which.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::loader::{self, ResourceSource};
use crate::models::{
    Dataset, DemandForecast, InventoryItem, ItemInsight, MetricSource, Priority, Recommendation, Season,
    SupplierMetrics, SupplierSummary,
};
use crate::sample;

/// Window, in days, for "expiring soon".
pub const EXPIRING_WITHIN_DAYS: i64 = 30;
/// Window, in days, for "critical".
pub const CRITICAL_WITHIN_DAYS: i64 = 7;
/// Stock above this many units counts as overstock.
pub const OVERSTOCK_ABOVE: u32 = 100;
/// Reliability at or above this counts as a sustainable supplier.
pub const SUSTAINABLE_RELIABILITY: f64 = 4.0;

const VELOCITY_WINDOW_DAYS: i64 = 30;
const STOCK_OUTLASTS_EXPIRY_FACTOR: f64 = 1.5;
const ZERO_SALES_PREFIX: usize = 3;
/// Watch window for expiry labels missing from [`figures::EXPIRY_THRESHOLDS`].
const DEFAULT_RISK_THRESHOLD_DAYS: i64 = 30;

/// Supplier risk above this is high, above [`MODERATE_SUPPLIER_RISK`] moderate.
pub const HIGH_SUPPLIER_RISK: f64 = 70.0;
pub const MODERATE_SUPPLIER_RISK: f64 = 50.0;
/// Expiring stock value from one supplier above which returns or promotions are suggested.
pub const SUPPLIER_EXPIRY_VALUE_ALERT: f64 = 1000.0;
/// How many of the riskiest suppliers are considered for recommendations.
const SUPPLIER_REVIEW_COUNT: usize = 3;

/// Months ahead covered by the demand forecast.
pub const FORECAST_MONTHS: u32 = 3;
/// Categories averaging a demand factor above this are seasonal peaks.
const SEASONAL_PEAK_FACTOR: f64 = 1.2;
/// A peak category holding fewer units than this is short for the season.
const SEASONAL_STOCK_FLOOR: u64 = 100;
/// A category selling under this share of the season's per-category mean is underperforming.
const UNDERPERFORMING_SHARE: f64 = 0.5;
const LOW_PEAK_SEASON_SALES: f64 = 50.0;
const LOW_TURNOVER_RATIO: f64 = 0.1;

/// Fixed figures shown next to the computed ones.
pub mod figures {
    pub const WASTE_REDUCTION_PCT: u32 = 85;
    pub const ENERGY_SAVINGS_PCT: u32 = 92;
    pub const GREEN_SCORE: u32 = 82;
    pub const PREDICTED_WASTE_KG: u32 = 125;
    pub const PREDICTION_ACCURACY_PCT: u32 = 94;
    pub const WASTE_COST_SAVINGS: u32 = 2500;
    pub const WASTE_OPTIMIZATION_SCORE: u32 = 78;
    pub const ENERGY_CONSUMPTION_KWH: u32 = 4100;
    pub const ENERGY_COST_SAVINGS: u32 = 1800;
    pub const ENERGY_EFFICIENCY_SCORE: u32 = 88;
    pub const WASTE_SCORE: u32 = 85;
    pub const ENERGY_SCORE: u32 = 88;
    pub const SOURCING_SCORE: u32 = 82;
    pub const CARBON_SCORE: u32 = 75;
    pub const ON_TIME_DELIVERY_PCT: u32 = 96;
    pub const PEAK_SEASON: &str = "Summer";
    pub const SEASONAL_GROWTH_PCT: u32 = 35;
    pub const FORECAST_ACCURACY_PCT: u32 = 91;
    pub const INVENTORY_TURNOVER: u32 = 12;

    pub const EXPIRY_THRESHOLDS: [(&str, u32); 7] = [
        ("Shelf Life", 7),
        ("Expiration Date", 7),
        ("Warranty Period", 90),
        ("Fashion Season", 90),
        ("Quality Period", 180),
        ("Obsolescence", 180),
        ("Wear Period", 180),
    ];
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    TotalSales,
    TotalInventoryValue,
    SupplierCount,
    SustainableSupplierCount,
    AverageSupplierRating,
    ExpiringProducts,
    CriticalProducts,
    OverstockProducts,
    PredictedWasteValue,
    TotalItemsAtRisk,
    ZeroSalesProducts,
    WasteReduction,
    EnergySavings,
    GreenScore,
    PredictedWasteKg,
    PredictionAccuracy,
    WasteCostSavings,
    WasteOptimizationScore,
    EnergyConsumption,
    EnergyCostSavings,
    EnergyEfficiencyScore,
    WasteScore,
    EnergyScore,
    SourcingScore,
    CarbonScore,
    OnTimeDelivery,
    PeakSeason,
    SeasonalGrowth,
    ForecastAccuracy,
    InventoryTurnover,
    ExpiryThresholds,
    PredictedAtRisk,
    SupplierRiskSummary,
    SupplierRecommendations,
    SeasonalForecast,
    SeasonalRecommendations,
    SeasonalEfficiency,
}

impl MetricId {
    pub fn source(self) -> MetricSource {
        use MetricId::*;
        match self {
            TotalSales | TotalInventoryValue | SupplierCount | SustainableSupplierCount | AverageSupplierRating
            | ExpiringProducts | CriticalProducts | OverstockProducts | PredictedWasteValue | TotalItemsAtRisk
            | PredictedAtRisk | SupplierRiskSummary | SupplierRecommendations | SeasonalForecast
            | SeasonalRecommendations | SeasonalEfficiency => MetricSource::Computed,
            ZeroSalesProducts => MetricSource::Placeholder,
            _ => MetricSource::Constant,
        }
    }
}

/// Which path the last load took.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded,
    /// All three record sets were replaced by the built-in sample because of `0`.
    Fallback(LoadError),
}

impl LoadStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn cause(&self) -> Option<&LoadError> {
        match self {
            Self::Loaded => None,
            Self::Fallback(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct MetricsEngine {
    dataset: Dataset,
    status: LoadStatus,
    loaded_at: DateTime<Utc>,
}

impl MetricsEngine {
    /// Loads all three resources from `source`, or the sample dataset if any of them fails.
    pub async fn load(source: &dyn ResourceSource) -> Self {
        match loader::load_dataset(source).await {
            Ok(dataset) => {
                info!(
                    inventory = dataset.inventory.len(),
                    sales = dataset.sales.len(),
                    suppliers = dataset.suppliers.len(),
                    "dataset loaded"
                );
                Self::with_status(dataset, LoadStatus::Loaded)
            }
            Err(e) => {
                warn!(error = %e, "using built-in sample dataset");
                Self::with_status(sample::dataset(), LoadStatus::Fallback(e))
            }
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::with_status(dataset, LoadStatus::Loaded)
    }

    fn with_status(dataset: Dataset, status: LoadStatus) -> Self {
        Self {
            dataset,
            status,
            loaded_at: Utc::now(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    fn item_index(&self) -> HashMap<&str, &InventoryItem> {
        let mut index = HashMap::with_capacity(self.dataset.inventory.len());
        for item in &self.dataset.inventory {
            index.entry(item.product_id.as_str()).or_insert(item);
        }
        index
    }

    /// Sum of quantity sold times selling price. Sales of unknown products contribute nothing.
    pub fn total_sales(&self) -> f64 {
        let index = self.item_index();
        self.dataset
            .sales
            .iter()
            .filter_map(|sale| {
                index
                    .get(sale.product_id.as_str())
                    .map(|item| f64::from(sale.quantity_sold) * item.selling_price)
            })
            .sum()
    }

    pub fn total_inventory_value(&self) -> f64 {
        self.dataset.inventory.iter().map(InventoryItem::stock_cost).sum()
    }

    pub fn supplier_count(&self) -> usize {
        self.dataset.suppliers.len()
    }

    pub fn sustainable_supplier_count(&self) -> usize {
        self.dataset
            .suppliers
            .iter()
            .filter(|s| s.reliability_score >= SUSTAINABLE_RELIABILITY)
            .count()
    }

    /// Mean reliability rounded to one decimal, 0 with no suppliers.
    pub fn average_supplier_rating(&self) -> f64 {
        let suppliers = &self.dataset.suppliers;
        if suppliers.is_empty() {
            return 0.0;
        }
        let mean = suppliers.iter().map(|s| s.reliability_score).sum::<f64>() / suppliers.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    fn avg_daily_sales(&self, product_id: &str, now: DateTime<Utc>) -> f64 {
        let cutoff = (now - Duration::days(VELOCITY_WINDOW_DAYS)).naive_utc();
        let sold: u64 = self
            .dataset
            .sales
            .iter()
            .filter(|s| s.product_id == product_id && s.timestamp >= cutoff)
            .map(|s| u64::from(s.quantity_sold))
            .sum();
        sold as f64 / VELOCITY_WINDOW_DAYS as f64
    }

    fn insight(&self, item: &InventoryItem, avg_daily_sales: f64, now: DateTime<Utc>) -> ItemInsight {
        let days_to_expiry = item.days_to_expiry(now);
        let estimated_days_stock_left = estimated_stock_days(item, avg_daily_sales);
        let risk_score = risk_score(item, days_to_expiry, avg_daily_sales, estimated_days_stock_left);
        ItemInsight {
            item: item.clone(),
            days_to_expiry,
            avg_daily_sales_last_30d: avg_daily_sales,
            estimated_days_stock_left,
            risk_score,
        }
    }

    pub fn item_insight_at(&self, item: &InventoryItem, now: DateTime<Utc>) -> ItemInsight {
        self.insight(item, self.avg_daily_sales(&item.product_id, now), now)
    }

    pub fn insights_at(&self, now: DateTime<Utc>) -> Vec<ItemInsight> {
        self.dataset
            .inventory
            .iter()
            .map(|item| self.item_insight_at(item, now))
            .collect()
    }

    /// Lots expiring within 30 days, soonest first, ties broken by product id.
    pub fn expiring_products_at(&self, now: DateTime<Utc>) -> Vec<ItemInsight> {
        let mut expiring: Vec<ItemInsight> = self
            .insights_at(now)
            .into_iter()
            .filter(|i| i.days_to_expiry <= EXPIRING_WITHIN_DAYS)
            .collect();
        expiring.sort_by(|a, b| {
            a.days_to_expiry
                .cmp(&b.days_to_expiry)
                .then_with(|| a.item.product_id.cmp(&b.item.product_id))
        });
        expiring
    }

    pub fn expiring_products(&self) -> Vec<ItemInsight> {
        self.expiring_products_at(Utc::now())
    }

    pub fn critical_expiring_products_at(&self, now: DateTime<Utc>) -> Vec<ItemInsight> {
        self.expiring_products_at(now)
            .into_iter()
            .filter(|i| i.days_to_expiry <= CRITICAL_WITHIN_DAYS)
            .collect()
    }

    pub fn critical_expiring_products(&self) -> Vec<ItemInsight> {
        self.critical_expiring_products_at(Utc::now())
    }

    /// Lots the waste model expects to expire unsold.
    ///
    /// A lot qualifies when it expires within its label's threshold, has not expired yet, and its
    /// risk score clears its tier's cutoff. Highest risk first, then soonest expiry.
    pub fn predicted_at_risk_at(&self, now: DateTime<Utc>) -> Vec<ItemInsight> {
        let mut predicted: Vec<ItemInsight> = self
            .insights_at(now)
            .into_iter()
            .filter(|i| {
                (0..=risk_threshold_days(&i.item.expiry_type)).contains(&i.days_to_expiry)
                    && i.risk_score > i.item.expiry_tier().risk_cutoff()
            })
            .collect();
        predicted.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then(a.days_to_expiry.cmp(&b.days_to_expiry))
                .then_with(|| a.item.product_id.cmp(&b.item.product_id))
        });
        predicted
    }

    pub fn predicted_at_risk(&self) -> Vec<ItemInsight> {
        self.predicted_at_risk_at(Utc::now())
    }

    pub fn high_stock_risk_products(&self) -> Vec<&InventoryItem> {
        self.dataset
            .inventory
            .iter()
            .filter(|i| i.quantity_in_stock > OVERSTOCK_ABOVE)
            .collect()
    }

    /// First few lots reported with zero velocity. No sales history is consulted.
    pub fn zero_sales_products_at(&self, now: DateTime<Utc>) -> Vec<ItemInsight> {
        self.dataset
            .inventory
            .iter()
            .take(ZERO_SALES_PREFIX)
            .map(|item| self.insight(item, 0.0, now))
            .collect()
    }

    pub fn zero_sales_products(&self) -> Vec<ItemInsight> {
        self.zero_sales_products_at(Utc::now())
    }

    /// Cost of the stock in the expiring list.
    pub fn predicted_waste_value_at(&self, now: DateTime<Utc>) -> f64 {
        self.expiring_products_at(now).iter().map(|i| i.item.stock_cost()).sum()
    }

    pub fn predicted_waste_value(&self) -> f64 {
        self.predicted_waste_value_at(Utc::now())
    }

    pub fn total_items_at_risk_at(&self, now: DateTime<Utc>) -> u64 {
        self.expiring_products_at(now)
            .iter()
            .map(|i| u64::from(i.item.quantity_in_stock))
            .sum()
    }

    pub fn total_items_at_risk(&self) -> u64 {
        self.total_items_at_risk_at(Utc::now())
    }

    /// One entry per supplier referenced by inventory, in first-reference order.
    pub fn supplier_metrics_at(&self, now: DateTime<Utc>) -> Vec<SupplierMetrics> {
        let suppliers: HashMap<&str, _> = self
            .dataset
            .suppliers
            .iter()
            .map(|s| (s.supplier_id.as_str(), s))
            .collect();

        let mut order: Vec<&str> = Vec::new();
        let mut lots: HashMap<&str, Vec<&InventoryItem>> = HashMap::new();
        for item in &self.dataset.inventory {
            let id = item.supplier_id.as_str();
            if !lots.contains_key(id) {
                order.push(id);
            }
            lots.entry(id).or_default().push(item);
        }

        order
            .into_iter()
            .filter_map(|id| {
                let supplier = suppliers.get(id)?;
                let items = &lots[id];
                let total_inventory_value: f64 = items.iter().map(|i| i.stock_cost()).sum();
                let expiry_risk_value: f64 = items
                    .iter()
                    .filter(|i| i.days_to_expiry(now) <= EXPIRING_WITHIN_DAYS)
                    .map(|i| i.stock_cost())
                    .sum();

                let mut risk = (1.0 - supplier.reliability_score / 5.0) * 30.0;
                risk += (f64::from(supplier.delivery_time_days) / 14.0).min(1.0) * 20.0;
                if total_inventory_value > 0.0 {
                    risk += expiry_risk_value / total_inventory_value * 50.0;
                }

                Some(SupplierMetrics {
                    supplier_id: supplier.supplier_id.clone(),
                    supplier_name: supplier.supplier_name.clone(),
                    total_products: items.len(),
                    total_inventory_value,
                    expiry_risk_value,
                    reliability_score: supplier.reliability_score,
                    delivery_time_days: supplier.delivery_time_days,
                    risk_score: risk.min(100.0),
                })
            })
            .collect()
    }

    /// Risk bands and totals over [`MetricsEngine::supplier_metrics_at`]. `None` when no supplier
    /// is referenced by inventory.
    pub fn supplier_summary_at(&self, now: DateTime<Utc>) -> Option<SupplierSummary> {
        let metrics = self.supplier_metrics_at(now);
        if metrics.is_empty() {
            return None;
        }
        let n = metrics.len() as f64;
        let count = |low: f64, high: f64| {
            metrics
                .iter()
                .filter(|m| m.risk_score > low && m.risk_score <= high)
                .count()
        };

        Some(SupplierSummary {
            total_suppliers: metrics.len(),
            avg_reliability_score: metrics.iter().map(|m| m.reliability_score).sum::<f64>() / n,
            avg_delivery_time_days: metrics.iter().map(|m| f64::from(m.delivery_time_days)).sum::<f64>() / n,
            total_inventory_value: metrics.iter().map(|m| m.total_inventory_value).sum(),
            total_expiry_risk_value: metrics.iter().map(|m| m.expiry_risk_value).sum(),
            high_risk_suppliers: count(HIGH_SUPPLIER_RISK, f64::INFINITY),
            moderate_risk_suppliers: count(MODERATE_SUPPLIER_RISK, HIGH_SUPPLIER_RISK),
            low_risk_suppliers: count(f64::NEG_INFINITY, MODERATE_SUPPLIER_RISK),
        })
    }

    /// Warnings for the three riskiest suppliers, then for the three with the most expiring stock.
    pub fn supplier_recommendations_at(&self, now: DateTime<Utc>) -> Vec<Recommendation> {
        let mut metrics = self.supplier_metrics_at(now);
        let mut recommendations = Vec::new();

        metrics.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        for m in metrics.iter().take(SUPPLIER_REVIEW_COUNT) {
            let (issue, message, priority) = if m.risk_score > HIGH_SUPPLIER_RISK {
                (
                    "High Risk Supplier",
                    format!(
                        "Consider alternative suppliers to {}. Risk score: {:.1}/100",
                        m.supplier_name, m.risk_score
                    ),
                    Priority::High,
                )
            } else if m.risk_score > MODERATE_SUPPLIER_RISK {
                (
                    "Moderate Risk Supplier",
                    format!("Monitor {} closely. Risk score: {:.1}/100", m.supplier_name, m.risk_score),
                    Priority::Medium,
                )
            } else {
                continue;
            };
            recommendations.push(Recommendation {
                subject: m.supplier_name.clone(),
                issue: issue.to_string(),
                message,
                priority,
            });
        }

        metrics.sort_by(|a, b| b.expiry_risk_value.total_cmp(&a.expiry_risk_value));
        for m in metrics
            .iter()
            .take(SUPPLIER_REVIEW_COUNT)
            .filter(|m| m.expiry_risk_value > SUPPLIER_EXPIRY_VALUE_ALERT)
        {
            recommendations.push(Recommendation {
                subject: m.supplier_name.clone(),
                issue: "High Expiry Risk".to_string(),
                message: format!(
                    "${:.2} of stock from {} expires within {EXPIRING_WITHIN_DAYS} days. \
                     Consider promotional pricing or supplier returns.",
                    m.expiry_risk_value, m.supplier_name
                ),
                priority: Priority::High,
            });
        }

        recommendations
    }

    /// Inventory categories in order of first appearance.
    fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for item in &self.dataset.inventory {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        categories
    }

    /// Units sold per category during `season`, over sales of known products.
    fn category_sales_in(&self, season: Season) -> BTreeMap<&str, u64> {
        let index = self.item_index();
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for sale in &self.dataset.sales {
            if Season::of_month(sale.timestamp.month()) != season {
                continue;
            }
            if let Some(item) = index.get(sale.product_id.as_str()) {
                *totals.entry(item.category.as_str()).or_default() += u64::from(sale.quantity_sold);
            }
        }
        totals
    }

    /// Expected sales per category for each of the `months` months after `now`.
    ///
    /// Historical units for a (category, month) pair are spread over a twelfth of the span between
    /// the first and last sale. Months without history use the category's mean rate. The rate is
    /// scaled by the demand factor of the category's first lot.
    pub fn demand_forecast_at(&self, now: DateTime<Utc>, months: u32) -> Vec<DemandForecast> {
        let sales = &self.dataset.sales;
        let first = sales.iter().map(|s| s.timestamp).min();
        let last = sales.iter().map(|s| s.timestamp).max();
        let span_days = match (first, last) {
            (Some(first), Some(last)) => (last - first).num_days().max(1) as f64,
            _ => 1.0,
        };

        let index = self.item_index();
        let mut history: BTreeMap<(&str, u32), u64> = BTreeMap::new();
        for sale in sales {
            if let Some(item) = index.get(sale.product_id.as_str()) {
                *history.entry((item.category.as_str(), sale.timestamp.month())).or_default() +=
                    u64::from(sale.quantity_sold);
            }
        }
        let rate = |units: u64| units as f64 / (span_days / 12.0);

        let mut forecast = Vec::new();
        for step in 1..=months {
            let month0 = now.month0() + step;
            let (year, month) = (now.year() + (month0 / 12) as i32, month0 % 12 + 1);

            for category in self.categories() {
                let base = match history.get(&(category, month)) {
                    Some(units) => rate(*units),
                    None => {
                        let rates: Vec<f64> = history
                            .iter()
                            .filter(|((c, _), _)| *c == category)
                            .map(|(_, units)| rate(*units))
                            .collect();
                        if rates.is_empty() {
                            0.0
                        } else {
                            rates.iter().sum::<f64>() / rates.len() as f64
                        }
                    }
                };
                let factor = self
                    .dataset
                    .inventory
                    .iter()
                    .find(|i| i.category == category)
                    .map_or(1.0, |i| i.seasonal_demand_factor);
                let daily_rate = base * factor;

                forecast.push(DemandForecast {
                    category: category.to_string(),
                    month,
                    season: Season::of_month(month),
                    daily_rate,
                    forecasted_sales: daily_rate * days_in_month(year, month),
                });
            }
        }
        forecast
    }

    pub fn demand_forecast(&self) -> Vec<DemandForecast> {
        self.demand_forecast_at(Utc::now(), FORECAST_MONTHS)
    }

    /// Promotion and restocking advice for the season containing `now`.
    pub fn seasonal_recommendations_at(&self, now: DateTime<Utc>) -> Vec<Recommendation> {
        let season = Season::of_month(now.month());
        let mut recommendations = Vec::new();

        let performance = self.category_sales_in(season);
        if !performance.is_empty() {
            let mean = performance.values().sum::<u64>() as f64 / performance.len() as f64;
            for (category, units) in &performance {
                if (*units as f64) < mean * UNDERPERFORMING_SHARE {
                    recommendations.push(Recommendation {
                        subject: category.to_string(),
                        issue: "Low Seasonal Sales".to_string(),
                        message: format!(
                            "Consider promotional pricing for {category} during {} to boost sales.",
                            season.name()
                        ),
                        priority: Priority::Medium,
                    });
                }
            }
        }

        for category in self.categories() {
            let lots: Vec<&InventoryItem> =
                self.dataset.inventory.iter().filter(|i| i.category == category).collect();
            let factor = lots.iter().map(|i| i.seasonal_demand_factor).sum::<f64>() / lots.len() as f64;
            let stock: u64 = lots.iter().map(|i| u64::from(i.quantity_in_stock)).sum();
            if factor > SEASONAL_PEAK_FACTOR && stock < SEASONAL_STOCK_FLOOR {
                recommendations.push(Recommendation {
                    subject: category.to_string(),
                    issue: "Seasonal Stock Shortage".to_string(),
                    message: format!(
                        "Increase stock levels for {category} during {} to meet seasonal demand \
                         (current stock: {stock}).",
                        season.name()
                    ),
                    priority: Priority::High,
                });
            }
        }

        recommendations
    }

    pub fn seasonal_recommendations(&self) -> Vec<Recommendation> {
        self.seasonal_recommendations_at(Utc::now())
    }

    /// How well stock tracks seasonal demand, 0 to 100.
    ///
    /// Starts at 100. Loses 20 when peak categories average under 50 units this season, 15 when
    /// units sold are under a tenth of units held, and 15 when the mean demand factor is below 1.
    pub fn seasonal_efficiency_score_at(&self, now: DateTime<Utc>) -> u32 {
        let inventory = &self.dataset.inventory;
        let mut score: u32 = 100;

        let peaks: Vec<&str> = inventory
            .iter()
            .filter(|i| i.seasonal_demand_factor > SEASONAL_PEAK_FACTOR)
            .map(|i| i.category.as_str())
            .collect();
        let peak_sales: Vec<u64> = self
            .category_sales_in(Season::of_month(now.month()))
            .into_iter()
            .filter(|(category, _)| peaks.contains(category))
            .map(|(_, units)| units)
            .collect();
        if !peak_sales.is_empty() {
            let mean = peak_sales.iter().sum::<u64>() as f64 / peak_sales.len() as f64;
            if mean < LOW_PEAK_SEASON_SALES {
                score -= 20;
            }
        }

        let held: u64 = inventory.iter().map(|i| u64::from(i.quantity_in_stock)).sum();
        let sold: u64 = self.dataset.sales.iter().map(|s| u64::from(s.quantity_sold)).sum();
        if held > 0 && (sold as f64 / held as f64) < LOW_TURNOVER_RATIO {
            score -= 15;
        }

        if !inventory.is_empty() {
            let factors: f64 = inventory.iter().map(|i| i.seasonal_demand_factor).sum();
            if factors / (inventory.len() as f64) < 1.0 {
                score -= 15;
            }
        }

        debug!(score, "seasonal efficiency");
        score
    }

    pub fn seasonal_efficiency_score(&self) -> u32 {
        self.seasonal_efficiency_score_at(Utc::now())
    }

    /// Units sold per season, in spring-to-winter order.
    pub fn seasonal_sales(&self) -> Vec<(Season, u64)> {
        let mut totals: HashMap<Season, u64> = HashMap::new();
        for sale in &self.dataset.sales {
            *totals.entry(Season::of_month(sale.timestamp.month())).or_default() += u64::from(sale.quantity_sold);
        }
        Season::ALL
            .iter()
            .map(|season| (*season, totals.get(season).copied().unwrap_or(0)))
            .collect()
    }

    /// Units sold per calendar month, January first.
    pub fn monthly_sales(&self) -> [u64; 12] {
        let mut months = [0u64; 12];
        for sale in &self.dataset.sales {
            months[sale.timestamp.month0() as usize] += u64::from(sale.quantity_sold);
        }
        months
    }

    /// Sales transactions per hour of day.
    pub fn footfall_by_hour(&self) -> [u32; 24] {
        let mut hours = [0u32; 24];
        for sale in &self.dataset.sales {
            hours[sale.timestamp.hour() as usize] += 1;
        }
        hours
    }

    pub fn expiry_thresholds(&self) -> &'static [(&'static str, u32)] {
        &figures::EXPIRY_THRESHOLDS
    }

    pub fn waste_reduction(&self) -> u32 {
        figures::WASTE_REDUCTION_PCT
    }

    pub fn energy_savings(&self) -> u32 {
        figures::ENERGY_SAVINGS_PCT
    }

    pub fn green_score(&self) -> u32 {
        figures::GREEN_SCORE
    }

    pub fn predicted_waste_kg(&self) -> u32 {
        figures::PREDICTED_WASTE_KG
    }

    pub fn prediction_accuracy(&self) -> u32 {
        figures::PREDICTION_ACCURACY_PCT
    }

    pub fn waste_cost_savings(&self) -> u32 {
        figures::WASTE_COST_SAVINGS
    }

    pub fn waste_optimization_score(&self) -> u32 {
        figures::WASTE_OPTIMIZATION_SCORE
    }

    pub fn energy_consumption(&self) -> u32 {
        figures::ENERGY_CONSUMPTION_KWH
    }

    pub fn energy_cost_savings(&self) -> u32 {
        figures::ENERGY_COST_SAVINGS
    }

    pub fn energy_efficiency_score(&self) -> u32 {
        figures::ENERGY_EFFICIENCY_SCORE
    }

    pub fn waste_score(&self) -> u32 {
        figures::WASTE_SCORE
    }

    pub fn energy_score(&self) -> u32 {
        figures::ENERGY_SCORE
    }

    pub fn sourcing_score(&self) -> u32 {
        figures::SOURCING_SCORE
    }

    pub fn carbon_score(&self) -> u32 {
        figures::CARBON_SCORE
    }

    pub fn on_time_delivery_rate(&self) -> u32 {
        figures::ON_TIME_DELIVERY_PCT
    }

    pub fn peak_season(&self) -> &'static str {
        figures::PEAK_SEASON
    }

    pub fn seasonal_growth(&self) -> u32 {
        figures::SEASONAL_GROWTH_PCT
    }

    pub fn forecast_accuracy(&self) -> u32 {
        figures::FORECAST_ACCURACY_PCT
    }

    pub fn inventory_turnover(&self) -> u32 {
        figures::INVENTORY_TURNOVER
    }
}

/// Days ahead of expiry a lot with this label is watched by the waste model.
pub fn risk_threshold_days(expiry_type: &str) -> i64 {
    figures::EXPIRY_THRESHOLDS
        .iter()
        .find(|(label, _)| *label == expiry_type.trim())
        .map(|(_, days)| i64::from(*days))
        .unwrap_or(DEFAULT_RISK_THRESHOLD_DAYS)
}

fn days_in_month(year: i32, month: u32) -> f64 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as f64,
        _ => 30.0,
    }
}

/// Days the current stock lasts at `avg_daily_sales`, or a per-category guess when nothing sells.
fn estimated_stock_days(item: &InventoryItem, avg_daily_sales: f64) -> f64 {
    let stock = f64::from(item.quantity_in_stock);
    if avg_daily_sales > 0.0 {
        return stock / avg_daily_sales;
    }
    let (per_unit, floor, ceiling) = match item.category.as_str() {
        "Groceries" => (2.0, 30.0, 90.0),
        "Beauty & Health" => (3.0, 60.0, 180.0),
        "Electronics" => (5.0, 90.0, 365.0),
        "Clothing" => (2.0, 30.0, 180.0),
        _ => (4.0, 60.0, 365.0),
    };
    (stock * per_unit).clamp(floor, ceiling)
}

fn risk_score(item: &InventoryItem, days_to_expiry: i64, avg_daily_sales: f64, stock_days: f64) -> f64 {
    let mut risk: f64 = match days_to_expiry {
        d if d <= 0 => 100.0,
        d if d <= CRITICAL_WITHIN_DAYS => 80.0,
        d if d <= EXPIRING_WITHIN_DAYS => 60.0,
        d if d <= 90 => 40.0,
        _ => 20.0,
    };

    if avg_daily_sales == 0.0 {
        risk += 30.0;
    } else if stock_days > days_to_expiry as f64 * STOCK_OUTLASTS_EXPIRY_FACTOR {
        risk += 25.0;
    }

    (risk * item.expiry_tier().weight()).min(100.0)
}
