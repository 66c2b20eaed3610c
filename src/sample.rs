//! Built-in records used whenever the live resources cannot be loaded.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Dataset, InventoryItem, SalesRecord, Supplier};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn lot(
    id: &str,
    name: &str,
    category: &str,
    purchased: NaiveDate,
    expires: NaiveDate,
    expiry_type: &str,
    quantity: u32,
    cost: f64,
    price: f64,
    seasonal: f64,
) -> InventoryItem {
    InventoryItem {
        product_id: id.to_string(),
        product_name: name.to_string(),
        category: category.to_string(),
        supplier_id: id.to_string(),
        purchase_date: purchased,
        expiry_date: expires,
        expiry_type: expiry_type.to_string(),
        quantity_in_stock: quantity,
        cost_price: cost,
        selling_price: price,
        seasonal_demand_factor: seasonal,
    }
}

fn sale(id: &str, timestamp: NaiveDateTime, quantity: u32) -> SalesRecord {
    SalesRecord {
        product_id: id.to_string(),
        timestamp,
        quantity_sold: quantity,
    }
}

fn supplier(id: &str, name: &str, reliability: f64, delivery: u32, email: &str, phone: &str) -> Supplier {
    Supplier {
        supplier_id: id.to_string(),
        supplier_name: name.to_string(),
        reliability_score: reliability,
        delivery_time_days: delivery,
        contact_email: email.to_string(),
        phone: phone.to_string(),
    }
}

pub fn dataset() -> Dataset {
    Dataset {
        inventory: vec![
            lot("1", "Milk", "Dairy", date(2024, 1, 15), date(2024, 2, 15), "Perishable", 50, 2.5, 3.99, 1.2),
            lot("2", "Bread", "Bakery", date(2024, 1, 10), date(2024, 2, 10), "Perishable", 30, 1.5, 2.49, 1.0),
            lot("3", "Apples", "Produce", date(2024, 1, 20), date(2024, 2, 20), "Perishable", 100, 1.2, 1.99, 1.5),
            lot("4", "Chicken", "Meat", date(2024, 1, 8), date(2024, 2, 8), "Perishable", 25, 6.5, 8.99, 1.1),
            lot("5", "Rice", "Pantry", date(2024, 1, 1), date(2024, 12, 31), "Non-perishable", 40, 3.5, 4.99, 0.9),
        ],
        sales: vec![
            sale("1", at(2024, 2, 1, 10, 30), 2),
            sale("2", at(2024, 2, 1, 11, 15), 1),
            sale("3", at(2024, 2, 2, 9, 45), 3),
            sale("4", at(2024, 2, 2, 14, 20), 1),
            sale("5", at(2024, 2, 3, 16, 10), 2),
        ],
        suppliers: vec![
            supplier("1", "Fresh Farms Co.", 4.8, 2, "contact@freshfarms.com", "+1-555-0101"),
            supplier("2", "Dairy Delights", 4.6, 1, "orders@dairydelights.com", "+1-555-0102"),
            supplier("3", "Bakery Fresh", 4.5, 1, "sales@bakeryfresh.com", "+1-555-0103"),
            supplier("4", "Meat Masters", 4.3, 3, "info@meatmasters.com", "+1-555-0104"),
            supplier("5", "Pantry Plus", 4.1, 5, "orders@pantryplus.com", "+1-555-0105"),
        ],
    }
}
