//! The persisted workbook and its file-backed cell store
//!
//! The whole document is held in memory behind a lock and written back in
//! one piece by [`WorkbookStore::save`]. Nothing reaches disk between saves.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cell_store::{CellStore, Row};
use super::file_io::{read_json, write_json_atomic};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{CellAddress, CellValue, Sheet};

pub const WORKBOOK_SCHEMA_VERSION: u32 = 1;

/// One sheet: sparse rows of cells plus free-text notes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    /// Row number -> column letter -> value. A present but empty row is a
    /// deliberate blank line.
    #[serde(default)]
    pub rows: BTreeMap<u32, Row>,

    /// Cell reference (e.g. "D12") -> note text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,
}

impl SheetData {
    pub fn max_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }
}

/// The whole tabular document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub sheets: BTreeMap<Sheet, SheetData>,
}

fn default_schema_version() -> u32 {
    WORKBOOK_SCHEMA_VERSION
}

impl Default for Workbook {
    fn default() -> Self {
        Self {
            schema_version: WORKBOOK_SCHEMA_VERSION,
            sheets: Sheet::all()
                .into_iter()
                .map(|sheet| (sheet, SheetData::default()))
                .collect(),
        }
    }
}

impl Workbook {
    pub fn sheet(&self, sheet: Sheet) -> Option<&SheetData> {
        self.sheets.get(&sheet)
    }

    pub fn get(&self, address: &CellAddress) -> Option<&CellValue> {
        self.sheets
            .get(&address.sheet)?
            .rows
            .get(&address.row)?
            .get(&address.column.to_string())
    }

    pub fn get_mut(&mut self, address: &CellAddress) -> Option<&mut CellValue> {
        self.sheets
            .get_mut(&address.sheet)?
            .rows
            .get_mut(&address.row)?
            .get_mut(&address.column.to_string())
    }

    pub fn set(&mut self, address: &CellAddress, value: CellValue) {
        self.sheets
            .entry(address.sheet)
            .or_default()
            .rows
            .entry(address.row)
            .or_default()
            .insert(address.column.to_string(), value);
    }

    /// Mark a row as present even if it holds no cells
    pub fn touch_row(&mut self, sheet: Sheet, row: u32) {
        self.sheets
            .entry(sheet)
            .or_default()
            .rows
            .entry(row)
            .or_default();
    }
}

/// File-backed [`CellStore`] over a [`Workbook`]
pub struct WorkbookStore {
    path: PathBuf,
    book: RwLock<Workbook>,
}

impl WorkbookStore {
    /// Create a store for `path` holding an empty workbook; call [`load`](Self::load) to read it
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            book: RwLock::new(Workbook::default()),
        }
    }

    /// Create a store around an existing in-memory workbook
    pub fn with_workbook(path: PathBuf, workbook: Workbook) -> Self {
        Self {
            path,
            book: RwLock::new(workbook),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Replace the in-memory workbook with the persisted one
    pub fn load(&self) -> InvenGoResult<()> {
        let workbook: Workbook = read_json(&self.path)?;
        if workbook.schema_version > WORKBOOK_SCHEMA_VERSION {
            return Err(InvenGoError::Storage(format!(
                "Workbook schema {} is newer than supported ({})",
                workbook.schema_version, WORKBOOK_SCHEMA_VERSION
            )));
        }

        let mut book = self.book.write().map_err(|e| {
            InvenGoError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *book = workbook;
        debug!(path = %self.path.display(), "workbook loaded");
        Ok(())
    }

    /// Copy of the current in-memory workbook
    pub fn snapshot(&self) -> InvenGoResult<Workbook> {
        let book = self.book.read().map_err(|e| {
            InvenGoError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(book.clone())
    }

    fn with_read<T>(&self, f: impl FnOnce(&Workbook) -> T) -> InvenGoResult<T> {
        let book = self.book.read().map_err(|e| {
            InvenGoError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(f(&book))
    }

    fn with_write<T>(&self, f: impl FnOnce(&mut Workbook) -> T) -> InvenGoResult<T> {
        let mut book = self.book.write().map_err(|e| {
            InvenGoError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(f(&mut book))
    }
}

impl CellStore for WorkbookStore {
    fn read(&self, address: &CellAddress) -> InvenGoResult<Option<CellValue>> {
        self.with_read(|book| book.get(address).cloned())
    }

    fn write(&self, address: &CellAddress, value: CellValue) -> InvenGoResult<()> {
        self.with_write(|book| book.set(address, value))
    }

    fn accumulate(&self, address: &CellAddress, delta: i64) -> InvenGoResult<i64> {
        let value = self.with_write(|book| match book.get_mut(address) {
            None => Err(InvenGoError::address_not_found(address)),
            Some(CellValue::Ledger(acc)) => Ok(acc.push(delta)),
            Some(cell @ CellValue::Number(_)) => {
                // A plain number becomes the base of a new accumulator.
                let base = cell.as_number().unwrap_or_default();
                let mut acc = crate::models::Accumulator::new(base);
                let value = acc.push(delta);
                *cell = CellValue::Ledger(acc);
                Ok(value)
            }
            Some(CellValue::Text(_)) => Err(InvenGoError::Validation(format!(
                "{} holds text and cannot accumulate",
                address
            ))),
        })??;
        debug!(cell = %address, delta, value, "accumulated");
        Ok(value)
    }

    fn annotate(&self, address: &CellAddress, text: &str) -> InvenGoResult<()> {
        self.with_write(|book| {
            book.sheets
                .entry(address.sheet)
                .or_default()
                .notes
                .insert(address.a1(), text.to_string());
        })
    }

    fn note(&self, address: &CellAddress) -> InvenGoResult<Option<String>> {
        self.with_read(|book| {
            book.sheet(address.sheet)
                .and_then(|sheet| sheet.notes.get(&address.a1()).cloned())
        })
    }

    fn max_row(&self, sheet: Sheet) -> InvenGoResult<u32> {
        self.with_read(|book| book.sheet(sheet).map(SheetData::max_row).unwrap_or(0))
    }

    fn row(&self, sheet: Sheet, row: u32) -> InvenGoResult<Option<Row>> {
        self.with_read(|book| book.sheet(sheet).and_then(|s| s.rows.get(&row).cloned()))
    }

    fn append_row(&self, sheet: Sheet, cells: Vec<(char, CellValue)>) -> InvenGoResult<u32> {
        self.with_write(|book| {
            let row = book.sheet(sheet).map(SheetData::max_row).unwrap_or(0) + 1;
            book.touch_row(sheet, row);
            for (column, value) in cells {
                book.set(&CellAddress::new(sheet, column, row), value);
            }
            row
        })
    }

    fn save(&self) -> InvenGoResult<()> {
        let book = self.book.read().map_err(|e| {
            InvenGoError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        write_json_atomic(&self.path, &*book)?;
        debug!(path = %self.path.display(), "workbook saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Accumulator;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, WorkbookStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = WorkbookStore::new(temp_dir.path().join("workbook.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_write_and_read() {
        let (_temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Stock, 'D', 2);

        assert_eq!(store.read(&addr).unwrap(), None);
        store.write(&addr, CellValue::text("Almonds")).unwrap();
        assert_eq!(store.read(&addr).unwrap(), Some(CellValue::text("Almonds")));
    }

    #[test]
    fn test_accumulate_requires_initialized_cell() {
        let (_temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Accounts, 'B', 2);

        let err = store.accumulate(&addr, 5).unwrap_err();
        assert!(matches!(err, InvenGoError::AddressNotFound { .. }));
    }

    #[test]
    fn test_accumulate_keeps_history() {
        let (_temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Stock, 'J', 2);
        store
            .write(&addr, CellValue::Ledger(Accumulator::new(20)))
            .unwrap();

        assert_eq!(store.accumulate(&addr, 10).unwrap(), 30);
        assert_eq!(store.accumulate(&addr, 5).unwrap(), 35);
        assert_eq!(store.read_value(&addr).unwrap(), 35);

        match store.read(&addr).unwrap() {
            Some(CellValue::Ledger(acc)) => assert_eq!(acc.deltas(), &[10, 5]),
            other => panic!("expected ledger cell, got {:?}", other),
        }
    }

    #[test]
    fn test_accumulate_promotes_plain_number() {
        let (_temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Accounts, 'B', 2);
        store.write(&addr, CellValue::Number(100)).unwrap();

        assert_eq!(store.accumulate(&addr, 50).unwrap(), 150);
    }

    #[test]
    fn test_accumulate_rejects_text() {
        let (_temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Stock, 'D', 2);
        store.write(&addr, CellValue::text("Almonds")).unwrap();

        assert!(store.accumulate(&addr, 1).unwrap_err().is_validation());
    }

    #[test]
    fn test_append_row_and_blank_rows() {
        let (_temp_dir, store) = create_test_store();

        let first = store
            .append_row(Sheet::Bills, vec![('A', CellValue::text("Bill No: INV0001"))])
            .unwrap();
        let blank = store.append_row(Sheet::Bills, Vec::new()).unwrap();
        let next = store
            .append_row(Sheet::Bills, vec![('C', CellValue::text("Subtotal:"))])
            .unwrap();

        assert_eq!((first, blank, next), (1, 2, 3));
        assert_eq!(store.max_row(Sheet::Bills).unwrap(), 3);
        assert!(store.row(Sheet::Bills, 2).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, store) = create_test_store();
        let addr = CellAddress::new(Sheet::Customers, 'I', 1);
        store
            .write(&addr, CellValue::Ledger(Accumulator::new(7)))
            .unwrap();
        store.accumulate(&addr, 1).unwrap();
        store
            .annotate(&CellAddress::new(Sheet::Bills, 'D', 5), "50GM x 2")
            .unwrap();
        store.save().unwrap();

        let reloaded = WorkbookStore::new(temp_dir.path().join("workbook.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.read_value(&addr).unwrap(), 8);
        assert_eq!(
            reloaded
                .note(&CellAddress::new(Sheet::Bills, 'D', 5))
                .unwrap()
                .as_deref(),
            Some("50GM x 2")
        );
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file, not directory").unwrap();

        let store = WorkbookStore::new(blocker.join("workbook.json"));
        assert!(matches!(store.save(), Err(InvenGoError::Io(_))));
    }

    #[test]
    fn test_first_free_row() {
        let (_temp_dir, store) = create_test_store();
        store
            .write(&CellAddress::new(Sheet::Accounts, 'G', 4), CellValue::Number(1))
            .unwrap();
        store
            .write(&CellAddress::new(Sheet::Accounts, 'G', 5), CellValue::Number(2))
            .unwrap();

        assert_eq!(store.first_free_row(Sheet::Accounts, 'G', 4).unwrap(), 6);
        assert_eq!(store.first_free_row(Sheet::Accounts, 'H', 4).unwrap(), 4);
    }
}
