//! Tabular resource loading.
//!
//! Resources are newline-separated rows of comma-separated fields with a mandatory header row.
//! There is no quoting or escaping: a comma inside a value shifts every later field of that row.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::LoadError;
use crate::models::{Dataset, InventoryItem, SalesRecord, Supplier};

pub const INVENTORY: &str = "inventory";
pub const SALES: &str = "sales";
pub const SUPPLIERS: &str = "suppliers";

/// One data row keyed by the header's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    line: usize,
    fields: HashMap<String, String>,
}

impl Record {
    /// 1-based line number of the row in its resource.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<T, String> {
        let raw = self.get(name);
        raw.parse()
            .map_err(|_| format!("field '{name}' has invalid value '{raw}'"))
    }

    fn finite(&self, name: &str) -> Result<f64, String> {
        let value: f64 = self.parse(name)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("field '{name}' is not a finite number: '{}'", self.get(name)))
        }
    }

    fn price(&self, name: &str) -> Result<f64, String> {
        let value = self.finite(name)?;
        if value < 0.0 {
            return Err(format!("field '{name}' must not be negative: {value}"));
        }
        Ok(value)
    }

    fn positive(&self, name: &str) -> Result<f64, String> {
        let value = self.finite(name)?;
        if value <= 0.0 {
            return Err(format!("field '{name}' must be positive: {value}"));
        }
        Ok(value)
    }

    /// Reliability is rated out of five.
    fn rating(&self, name: &str) -> Result<f64, String> {
        let value = self.finite(name)?;
        if !(0.0..=5.0).contains(&value) {
            return Err(format!("field '{name}' must be between 0 and 5: {value}"));
        }
        Ok(value)
    }

    fn date(&self, name: &str) -> Result<NaiveDate, String> {
        let raw = self.get(name);
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("field '{name}' is not a date: '{raw}'"))
    }

    fn timestamp(&self, name: &str) -> Result<NaiveDateTime, String> {
        let raw = self.get(name);
        raw.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()))
            .map_err(|_| format!("field '{name}' is not a timestamp: '{raw}'"))
    }
}

/// Splits `text` into header-keyed records.
///
/// Every field and header name is trimmed. Rows shorter than the header get empty strings for the
/// missing trailing fields, extra fields are ignored, blank rows are skipped.
pub fn parse_table(resource: &str, text: &str) -> Result<Vec<Record>, LoadError> {
    let mut lines = text.split('\n').map(|l| l.trim_end_matches('\r'));

    let header: Vec<String> = match lines.next() {
        Some(h) if !h.trim().is_empty() => h.split(',').map(|f| f.trim().to_string()).collect(),
        _ => {
            return Err(LoadError::Empty {
                resource: resource.to_string(),
            })
        }
    };

    let records = lines
        .enumerate()
        .filter(|(_, row)| !row.trim().is_empty())
        .map(|(idx, row)| {
            let mut values = row.split(',').map(str::trim);
            let fields = header
                .iter()
                .map(|name| (name.clone(), values.next().unwrap_or("").to_string()))
                .collect();
            Record { line: idx + 2, fields }
        })
        .collect();

    Ok(records)
}

/// Conversion of a raw record into a typed row.
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> Result<Self, String>;
}

impl FromRecord for InventoryItem {
    fn from_record(r: &Record) -> Result<Self, String> {
        Ok(InventoryItem {
            product_id: r.get("product_id").to_string(),
            product_name: r.get("product_name").to_string(),
            category: r.get("category").to_string(),
            supplier_id: r.get("supplier_id").to_string(),
            purchase_date: r.date("purchase_date")?,
            expiry_date: r.date("expiry_date")?,
            expiry_type: r.get("expiry_type").to_string(),
            quantity_in_stock: r.parse("quantity_in_stock")?,
            cost_price: r.price("cost_price")?,
            selling_price: r.price("selling_price")?,
            seasonal_demand_factor: r.positive("seasonal_demand_factor")?,
        })
    }
}

impl FromRecord for SalesRecord {
    fn from_record(r: &Record) -> Result<Self, String> {
        Ok(SalesRecord {
            product_id: r.get("product_id").to_string(),
            timestamp: r.timestamp("timestamp")?,
            quantity_sold: r.parse("quantity_sold")?,
        })
    }
}

impl FromRecord for Supplier {
    fn from_record(r: &Record) -> Result<Self, String> {
        Ok(Supplier {
            supplier_id: r.get("supplier_id").to_string(),
            supplier_name: r.get("supplier_name").to_string(),
            reliability_score: r.rating("reliability_score")?,
            delivery_time_days: r.parse("delivery_time_days")?,
            contact_email: r.get("contact_email").to_string(),
            phone: r.get("phone").to_string(),
        })
    }
}

pub fn parse_rows<T: FromRecord>(resource: &str, text: &str) -> Result<Vec<T>, LoadError> {
    parse_table(resource, text)?
        .iter()
        .map(|record| {
            T::from_record(record).map_err(|reason| LoadError::Malformed {
                resource: resource.to_string(),
                line: record.line(),
                reason,
            })
        })
        .collect()
}

/// Where the named tabular resources come from.
#[async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    async fn fetch(&self, resource: &str) -> Result<String, LoadError>;
}

/// Reads `<root>/<resource>.csv`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, resource: &str) -> PathBuf {
        self.root.join(format!("{resource}.csv"))
    }
}

#[async_trait]
impl ResourceSource for DirectorySource {
    async fn fetch(&self, resource: &str) -> Result<String, LoadError> {
        let path = self.path_of(resource);
        debug!(path = %path.display(), "reading resource");
        tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => LoadError::Malformed {
                resource: resource.to_string(),
                line: 0,
                reason: "content is not valid UTF-8".to_string(),
            },
            _ => LoadError::Missing {
                resource: resource.to_string(),
                source: e,
            },
        })
    }
}

/// Resources held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: &str, text: impl Into<String>) -> Self {
        self.resources.insert(resource.to_string(), text.into());
        self
    }
}

#[async_trait]
impl ResourceSource for MemorySource {
    async fn fetch(&self, resource: &str) -> Result<String, LoadError> {
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| LoadError::Missing {
                resource: resource.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such resource"),
            })
    }
}

/// Fetches and parses all three resources. The first failure aborts the whole load.
pub async fn load_dataset(source: &dyn ResourceSource) -> Result<Dataset, LoadError> {
    let inventory = parse_rows(INVENTORY, &source.fetch(INVENTORY).await?)?;
    let sales = parse_rows(SALES, &source.fetch(SALES).await?)?;
    let suppliers = parse_rows(SUPPLIERS, &source.fetch(SUPPLIERS).await?)?;

    Ok(Dataset {
        inventory,
        sales,
        suppliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_keys_fields_by_header() {
        let records = parse_table("t", "a, b ,c\n1,2,3\n 4 , 5 ,6\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("b"), "2");
        assert_eq!(records[1].get("a"), "4");
        assert_eq!(records[1].get("b"), "5");
        assert_eq!(records[1].line(), 3);
    }

    #[test]
    fn test_short_row_gets_empty_trailing_fields() {
        let records = parse_table("t", "a,b,c\n1").unwrap();

        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0].get("a"), "1");
        assert_eq!(records[0].get("b"), "");
        assert_eq!(records[0].get("c"), "");
    }

    #[test]
    fn test_embedded_comma_shifts_fields() {
        let records = parse_table("t", "name,qty\nEggs, large,12").unwrap();

        assert_eq!(records[0].get("name"), "Eggs");
        assert_eq!(records[0].get("qty"), "large");
    }

    #[test]
    fn test_crlf_and_blank_rows() {
        let records = parse_table("t", "a,b\r\n1,2\r\n\r\n3,4\r\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("b"), "4");
    }

    #[test]
    fn test_missing_header_is_empty_error() {
        let err = parse_table("inventory", "").unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
        assert_eq!(err.resource(), "inventory");
    }

    #[test]
    fn test_sales_rows_accept_common_timestamp_shapes() {
        let text = "product_id,timestamp,quantity_sold\n\
                    1,2024-02-01T10:30:00,2\n\
                    2,2024-02-01 11:15:00,1\n\
                    3,2024-02-02T09:45:00Z,3\n";
        let sales: Vec<SalesRecord> = parse_rows(SALES, text).unwrap();

        assert_eq!(sales.len(), 3);
        assert_eq!(sales[1].timestamp.format("%H:%M").to_string(), "11:15");
        assert_eq!(sales[2].quantity_sold, 3);
    }

    #[test]
    fn test_bad_number_reports_line() {
        let text = "product_id,timestamp,quantity_sold\n1,2024-02-01T10:30:00,two\n";
        let err = parse_rows::<SalesRecord>(SALES, text).unwrap_err();

        match err {
            LoadError::Malformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("quantity_sold"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_stock_is_malformed() {
        let text = "product_id,product_name,category,supplier_id,purchase_date,expiry_date,expiry_type,quantity_in_stock,cost_price,selling_price,seasonal_demand_factor\n\
                    1,Milk,Dairy,1,2024-01-15,2024-02-15,Perishable,-5,2.5,3.99,1.2\n";
        let err = parse_rows::<InventoryItem>(INVENTORY, text).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    fn inventory_row(cost: &str, selling: &str, factor: &str) -> String {
        format!(
            "product_id,product_name,category,supplier_id,purchase_date,expiry_date,expiry_type,quantity_in_stock,cost_price,selling_price,seasonal_demand_factor\n\
             1,Milk,Dairy,1,2024-01-15,2024-02-15,Perishable,5,{cost},{selling},{factor}\n"
        )
    }

    fn malformed_reason<T: FromRecord + std::fmt::Debug>(resource: &str, text: &str) -> String {
        match parse_rows::<T>(resource, text).unwrap_err() {
            LoadError::Malformed { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prices_must_be_finite_and_non_negative() {
        for (cost, selling, field) in [
            ("NaN", "3.99", "cost_price"),
            ("-3", "3.99", "cost_price"),
            ("2.5", "inf", "selling_price"),
            ("2.5", "-0.01", "selling_price"),
        ] {
            let reason = malformed_reason::<InventoryItem>(INVENTORY, &inventory_row(cost, selling, "1.2"));
            assert!(reason.contains(field), "{cost}/{selling}: {reason}");
        }

        let free: Vec<InventoryItem> = parse_rows(INVENTORY, &inventory_row("0", "0", "1.2")).unwrap();
        assert_eq!(free[0].cost_price, 0.0);
    }

    #[test]
    fn test_demand_factor_must_be_positive() {
        for factor in ["0", "-1.5", "NaN"] {
            let reason = malformed_reason::<InventoryItem>(INVENTORY, &inventory_row("2.5", "3.99", factor));
            assert!(reason.contains("seasonal_demand_factor"), "{factor}: {reason}");
        }
    }

    #[test]
    fn test_reliability_limited_to_five_point_scale() {
        let header = "supplier_id,supplier_name,reliability_score,delivery_time_days,contact_email,phone\n";
        for score in ["5.1", "-0.5", "NaN"] {
            let text = format!("{header}S1,Valley Dairy,{score},2,a@b.example,555\n");
            let reason = malformed_reason::<Supplier>(SUPPLIERS, &text);
            assert!(reason.contains("reliability_score"), "{score}: {reason}");
        }

        let text = format!("{header}S1,Valley Dairy,5,2,a@b.example,555\nS2,Gadget Hub,0,14,c@d.example,556\n");
        let suppliers: Vec<Supplier> = parse_rows(SUPPLIERS, &text).unwrap();
        assert_eq!(suppliers[1].reliability_score, 0.0);
    }

    #[tokio::test]
    async fn test_memory_source_reports_missing_resource() {
        let source = MemorySource::new().with(INVENTORY, "product_id\n");
        let err = load_dataset(&source).await.unwrap_err();

        assert!(err.is_missing());
        assert_eq!(err.resource(), SALES);
    }

    #[tokio::test]
    async fn test_directory_source_reads_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("suppliers.csv"), "supplier_id\nS1\n").unwrap();
        let source = DirectorySource::new(dir.path());

        let text = source.fetch(SUPPLIERS).await.unwrap();
        assert_eq!(parse_table(SUPPLIERS, &text).unwrap().len(), 1);

        let err = source.fetch(SALES).await.unwrap_err();
        assert!(err.is_missing());
    }
}
