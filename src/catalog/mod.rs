//! In-memory perfume catalog.
//!
//! The catalog is read once from a CSV file at startup and never mutated
//! afterwards, so it can be shared between requests behind an `Arc` without
//! any locking.

use csv::{ ReaderBuilder, StringRecord };
use log::{ info, warn };
use rand::seq::SliceRandom;
use serde_json::{ Map, Number, Value };
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// One catalog row: column name to cell value, in file column order.
pub type ProductRecord = Map<String, Value>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Catalog serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CatalogStore {
    // `None` marks a catalog that could not be loaded.
    records: Option<Vec<ProductRecord>>,
}

impl CatalogStore {
    /// Loads the catalog, falling back to the unavailable state on any error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(store) => {
                info!("Loaded {} catalog records from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                warn!("Catalog '{}' unavailable: {}", path.display(), e);
                Self::unavailable()
            }
        }
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = dedup_headers(csv_reader.headers()?);

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let mut record = ProductRecord::new();
            for (index, column) in headers.iter().enumerate() {
                let cell = row.get(index).unwrap_or("");
                record.insert(column.clone(), parse_cell(cell));
            }
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records: Some(records) }
    }

    pub fn unavailable() -> Self {
        Self { records: None }
    }

    pub fn is_available(&self) -> bool {
        self.records.is_some()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record, or an empty slice when the catalog is unavailable.
    pub fn all(&self) -> &[ProductRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    /// Up to `n` distinct records drawn uniformly without replacement.
    pub fn sample(&self, n: usize) -> Vec<&ProductRecord> {
        let mut rng = rand::thread_rng();
        self.all().choose_multiple(&mut rng, n).collect()
    }

    /// Samples `n` records and serializes them as a context string.
    /// An empty sample yields an empty string.
    pub fn sample_context(&self, n: usize) -> Result<String, CatalogError> {
        let sampled = self.sample(n);
        if sampled.is_empty() {
            return Ok(String::new());
        }
        Ok(serialize_context(&sampled)?)
    }
}

/// Array-of-objects JSON, column order kept, non-ASCII left unescaped.
pub fn serialize_context(records: &[&ProductRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

// Repeated column names get `.1`, `.2`, ... suffixes so no column is lost.
fn dedup_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let mut name = header.to_string();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", header, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

// A cell becomes a JSON number only when the number prints back as the
// exact cell text; anything else stays a string.
fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::String(String::new());
    }
    let number = cell
        .parse::<i64>()
        .map(Number::from)
        .or_else(|_| cell.parse::<u64>().map(Number::from))
        .ok()
        .or_else(|| cell.parse::<f64>().ok().and_then(Number::from_f64));
    match number {
        Some(number) if number.to_string() == cell => Value::Number(number),
        _ => Value::String(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CSV: &str = "name,brand,price,notes\n\
        عود ملكي,دار العطور,250,عود وعنبر\n\
        Rose Nuit,Maison,99.5,\n\
        Citrus,Fresh Co,120,ليمون\n";

    fn catalog_of(size: usize) -> CatalogStore {
        let records = (0..size)
            .map(|i| {
                let mut record = ProductRecord::new();
                record.insert("name".to_string(), Value::String(format!("perfume-{}", i)));
                record
            })
            .collect();
        CatalogStore::from_records(records)
    }

    #[test]
    fn parses_rows_with_typed_cells_and_empty_fallback() {
        let store = CatalogStore::from_reader(CSV.as_bytes()).unwrap();
        assert!(store.is_available());
        assert_eq!(store.len(), 3);

        let rose = &store.all()[1];
        assert_eq!(rose["name"], Value::String("Rose Nuit".into()));
        assert_eq!(rose["price"], serde_json::json!(99.5));
        assert_eq!(rose["notes"], Value::String(String::new()));
        assert_eq!(store.all()[0]["price"], serde_json::json!(250));
    }

    #[test]
    fn numbers_keep_their_exact_text() {
        let csv = "sku,barcode,code,ratio,big\n\
            12345678901234567890,007,+5,1.50,123456789012345678901234\n";
        let store = CatalogStore::from_reader(csv.as_bytes()).unwrap();
        let record = &store.all()[0];
        assert_eq!(record["sku"], serde_json::json!(12345678901234567890u64));
        assert_eq!(record["barcode"], Value::String("007".into()));
        assert_eq!(record["code"], Value::String("+5".into()));
        assert_eq!(record["ratio"], Value::String("1.50".into()));
        assert_eq!(record["big"], Value::String("123456789012345678901234".into()));
        assert_eq!(
            serialize_context(&[record]).unwrap(),
            r#"[{"sku":12345678901234567890,"barcode":"007","code":"+5","ratio":"1.50","big":"123456789012345678901234"}]"#
        );
    }

    #[test]
    fn duplicate_headers_keep_every_column() {
        let store = CatalogStore::from_reader("sku,name,name,name\n1,A,B,C\n".as_bytes()).unwrap();
        let context = serialize_context(&[&store.all()[0]]).unwrap();
        assert_eq!(context, r#"[{"sku":1,"name":"A","name.1":"B","name.2":"C"}]"#);
    }

    #[test]
    fn short_rows_are_padded_with_empty_strings() {
        let store = CatalogStore::from_reader("name,brand\nSolo\n".as_bytes()).unwrap();
        assert_eq!(store.all()[0]["brand"], Value::String(String::new()));
    }

    #[test]
    fn context_keeps_column_order_and_unicode() {
        let store = CatalogStore::from_reader(CSV.as_bytes()).unwrap();
        let first = &store.all()[0];
        let context = serialize_context(&[first]).unwrap();
        assert_eq!(
            context,
            r#"[{"name":"عود ملكي","brand":"دار العطور","price":250,"notes":"عود وعنبر"}]"#
        );
    }

    #[test]
    fn sample_returns_min_of_n_and_size_distinct_records() {
        for size in [0, 1, 3, 10, 25] {
            let store = catalog_of(size);
            let sampled = store.sample(10);
            assert_eq!(sampled.len(), size.min(10));
            let names: HashSet<_> = sampled
                .iter()
                .map(|r| r["name"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(names.len(), sampled.len());
        }
    }

    #[test]
    fn empty_sample_gives_empty_context() {
        assert_eq!(catalog_of(0).sample_context(10).unwrap(), "");
        assert_eq!(CatalogStore::unavailable().sample_context(10).unwrap(), "");
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::load(dir.path().join("missing.csv"));
        assert!(!store.is_available());
        assert!(store.sample(10).is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let store = CatalogStore::load(file.path());
        assert!(store.is_available());
        assert_eq!(store.len(), 3);
    }
}
