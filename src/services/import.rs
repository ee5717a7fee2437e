//! Catalog import from CSV
//!
//! Reads item rows, including stock columns written as legacy accumulator
//! formulas (`=100+20+10`), previews them against the catalog and inserts
//! the new ones. Stock histories are carried over term by term.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use crate::error::InvenGoResult;
use crate::models::{Accumulator, Money, NewItem};

use super::inventory::InventoryLedger;

/// Catalog columns, keyed by the names accepted in a header row
const COLUMNS: [(&str, &[&str]); 10] = [
    ("base_code", &["base_code", "base code", "base"]),
    ("category", &["category"]),
    ("code", &["code", "item code"]),
    ("name", &["name", "item", "item name"]),
    ("size", &["size"]),
    ("unit", &["unit"]),
    ("mrp", &["mrp"]),
    ("price", &["price", "rate"]),
    ("stock_in", &["stock_in", "stock", "stock in"]),
    ("stock_sold", &["stock_sold", "sale", "sold"]),
];

/// One successfully parsed CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    /// 1-based data row in the file
    pub row_number: usize,
    pub item: NewItem,
    pub stock_in: Accumulator,
    pub sold: Accumulator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    New,
    /// Code already in the catalog or earlier in the file
    Duplicate,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    pub item: Option<ParsedItem>,
    pub status: ImportStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    pub imported_codes: Vec<String>,
    pub error_messages: BTreeMap<usize, String>,
}

pub struct CatalogImport<'a> {
    inventory: &'a InventoryLedger<'a>,
}

impl<'a> CatalogImport<'a> {
    pub fn new(inventory: &'a InventoryLedger<'a>) -> Self {
        Self { inventory }
    }

    /// Parse every data row; a row that cannot be parsed becomes an `Err`
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
    ) -> InvenGoResult<Vec<Result<ParsedItem, String>>> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let positions = column_positions(reader.headers()?)?;
        let mut results = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let row_number = idx + 1;
            let parsed = match record {
                Ok(record) => parse_record(&record, &positions, row_number),
                Err(e) => Err(format!("Error reading CSV record: {}", e)),
            };
            results.push(parsed);
        }
        Ok(results)
    }

    /// Mark each parsed row as new, duplicate or failed
    pub fn generate_preview(
        &self,
        parsed: Vec<Result<ParsedItem, String>>,
    ) -> InvenGoResult<Vec<ImportPreviewEntry>> {
        let mut seen = HashSet::new();
        let mut preview = Vec::with_capacity(parsed.len());

        for (idx, result) in parsed.into_iter().enumerate() {
            let entry = match result {
                Ok(parsed) => {
                    let code = parsed.item.code.clone();
                    let status = if self.inventory.contains(&code)? || !seen.insert(code) {
                        ImportStatus::Duplicate
                    } else {
                        ImportStatus::New
                    };
                    ImportPreviewEntry {
                        row_number: parsed.row_number,
                        item: Some(parsed),
                        status,
                    }
                }
                Err(message) => ImportPreviewEntry {
                    row_number: idx + 1,
                    item: None,
                    status: ImportStatus::Error(message),
                },
            };
            preview.push(entry);
        }

        Ok(preview)
    }

    /// Insert the rows marked new; the caller saves the workbook
    pub fn import_from_preview(
        &self,
        preview: &[ImportPreviewEntry],
    ) -> InvenGoResult<ImportResult> {
        let mut result = ImportResult::default();

        for entry in preview {
            match (&entry.status, &entry.item) {
                (ImportStatus::New, Some(parsed)) => match self.inventory.insert_item(
                    parsed.item.clone(),
                    parsed.stock_in.clone(),
                    parsed.sold.clone(),
                ) {
                    Ok(item) => {
                        result.imported += 1;
                        result.imported_codes.push(item.code);
                    }
                    Err(e) => {
                        result.errors += 1;
                        result.error_messages.insert(entry.row_number, e.to_string());
                    }
                },
                (ImportStatus::Duplicate, _) => result.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    result.errors += 1;
                    result.error_messages.insert(entry.row_number, message.clone());
                }
                (ImportStatus::New, None) => {}
            }
        }

        info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors,
            "catalog import finished"
        );
        Ok(result)
    }
}

fn column_positions(headers: &StringRecord) -> InvenGoResult<BTreeMap<&'static str, usize>> {
    let mut positions = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let header = header.trim().to_lowercase();
        if let Some((key, _)) = COLUMNS
            .iter()
            .find(|(_, aliases)| aliases.contains(&header.as_str()))
        {
            positions.entry(*key).or_insert(idx);
        }
    }

    let missing: Vec<&str> = ["code", "name", "category", "size", "price"]
        .into_iter()
        .filter(|key| !positions.contains_key(key))
        .collect();
    if !missing.is_empty() {
        return Err(crate::error::InvenGoError::Import(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }
    Ok(positions)
}

fn field_of<'r>(
    record: &'r StringRecord,
    positions: &BTreeMap<&'static str, usize>,
    key: &str,
) -> &'r str {
    positions
        .get(key)
        .and_then(|idx| record.get(*idx))
        .unwrap_or("")
}

fn parse_record(
    record: &StringRecord,
    positions: &BTreeMap<&'static str, usize>,
    row_number: usize,
) -> Result<ParsedItem, String> {
    let field = |key: &str| field_of(record, positions, key);

    let size_text = field("size");
    let digits: String = size_text.chars().take_while(char::is_ascii_digit).collect();
    let size: u32 = digits
        .parse()
        .map_err(|_| format!("Invalid size '{}'", size_text))?;

    let price = Money::parse(field("price")).map_err(|e| format!("Price: {}", e))?;
    let mrp = match field("mrp") {
        "" => price,
        text => Money::parse(text).map_err(|e| format!("MRP: {}", e))?,
    };

    let ledger = |key: &str| -> Result<Accumulator, String> {
        match field(key) {
            "" => Ok(Accumulator::new(0)),
            text => Accumulator::from_legacy(text, 0).map_err(|e| e.to_string()),
        }
    };
    let stock_in = ledger("stock_in")?;
    let sold = ledger("stock_sold")?;

    let code = field("code").to_string();
    let base_code = match field("base_code") {
        "" => code.trim_end_matches(|c: char| c.is_ascii_digit()).to_string(),
        text => text.to_string(),
    };

    let item = NewItem {
        base_code,
        category: field("category").to_string(),
        code,
        name: field("name").to_string(),
        size,
        unit: field("unit").to_string(),
        mrp,
        price,
        initial_stock: 0,
    }
    .normalized();
    item.validate().map_err(|e| e.to_string())?;

    Ok(ParsedItem {
        row_number,
        item,
        stock_in,
        sold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inventory::tests::{create_test_store, new_item};

    const CSV: &str = "\
Base Code,Category,Code,Name,Size,Unit,MRP,Price,Stock,Sale
ALM,Dry Fruits,alm050,Almonds,50,GM,60,55,=100+20+10,=5+3
CSH,Dry Fruits,CSH100,Cashews,100GM,,130,120.50,40,
PEP,Spices,PEP050,Pepper,fifty,GM,45,40,10,0
PIS,Dry Fruits,PIS050,Pistachio,50,GM,90,85,=10*2,0
ALM,Dry Fruits,ALM050,Almonds again,50,GM,60,55,1,0
";

    #[test]
    fn test_parse_legacy_stock_columns() {
        let (_temp, store, journal) = create_test_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();
        let import = CatalogImport::new(&inventory);

        let parsed = import.parse_reader(CSV.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 5);

        let almonds = parsed[0].as_ref().unwrap();
        assert_eq!(almonds.item.code, "ALM050");
        assert_eq!(almonds.stock_in.value(), 130);
        assert_eq!(almonds.stock_in.deltas(), &[20, 10]);
        assert_eq!(almonds.sold.value(), 8);

        let cashews = parsed[1].as_ref().unwrap();
        assert_eq!(cashews.item.size, 100);
        assert_eq!(cashews.item.unit, "GM");
        assert_eq!(cashews.item.price, Money::from_paise(12050));
        assert_eq!(cashews.sold.value(), 0);

        assert!(parsed[2].as_ref().unwrap_err().contains("Invalid size"));
        assert!(parsed[3].is_err());
    }

    #[test]
    fn test_import_skips_duplicates_and_errors() {
        let (_temp, store, journal) = create_test_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();
        inventory.add_item(new_item("CSH100", 100, 120, 1)).unwrap();
        let import = CatalogImport::new(&inventory);

        let parsed = import.parse_reader(CSV.as_bytes()).unwrap();
        let preview = import.generate_preview(parsed).unwrap();
        assert_eq!(preview[0].status, ImportStatus::New);
        assert_eq!(preview[1].status, ImportStatus::Duplicate);
        assert_eq!(preview[4].status, ImportStatus::Duplicate);

        let result = import.import_from_preview(&preview).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.duplicates_skipped, 2);
        assert_eq!(result.errors, 2);
        assert!(result.error_messages.contains_key(&3));

        let almonds = inventory.lookup("ALM050").unwrap();
        assert_eq!(almonds.balance(), 122);
    }

    #[test]
    fn test_missing_columns() {
        let (_temp, store, journal) = create_test_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();
        let import = CatalogImport::new(&inventory);

        let err = import.parse_reader("code,name\nA,B\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("category"));
    }
}
