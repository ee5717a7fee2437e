//! Cell-addressed storage
//!
//! Ledgers read and mutate the workbook only through [`CellStore`]. Every
//! method takes `&self`; implementations guard their document internally.

use std::collections::BTreeMap;

use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{CellAddress, CellValue, Sheet};

/// A row of cells keyed by column letter
pub type Row = BTreeMap<String, CellValue>;

/// Text of a row's cell, empty when absent
pub fn row_text(row: &Row, column: char) -> String {
    row.get(&column.to_string())
        .map(CellValue::display)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Numeric value of a row's cell; text holding an integer is accepted
pub fn row_number(row: &Row, column: char) -> Option<i64> {
    match row.get(&column.to_string())? {
        CellValue::Text(s) => s.trim().parse().ok(),
        value => value.as_number(),
    }
}

/// Read and mutate single cells of the workbook
pub trait CellStore {
    /// Raw content of a cell, `None` if it was never written
    fn read(&self, address: &CellAddress) -> InvenGoResult<Option<CellValue>>;

    /// Overwrite a cell
    fn write(&self, address: &CellAddress, value: CellValue) -> InvenGoResult<()>;

    /// Append `delta` to the accumulator at `address` and return its new value
    ///
    /// Fails with [`InvenGoError::AddressNotFound`] if the cell was never
    /// initialized.
    fn accumulate(&self, address: &CellAddress, delta: i64) -> InvenGoResult<i64>;

    /// Attach a note to a cell, replacing any earlier note
    fn annotate(&self, address: &CellAddress, text: &str) -> InvenGoResult<()>;

    fn note(&self, address: &CellAddress) -> InvenGoResult<Option<String>>;

    /// Highest row that holds cells (or a deliberate blank), 0 for an empty sheet
    fn max_row(&self, sheet: Sheet) -> InvenGoResult<u32>;

    fn row(&self, sheet: Sheet, row: u32) -> InvenGoResult<Option<Row>>;

    /// Write `cells` into the row after [`max_row`](Self::max_row) and return
    /// its number. An empty `cells` still claims the row.
    fn append_row(&self, sheet: Sheet, cells: Vec<(char, CellValue)>) -> InvenGoResult<u32>;

    /// Persist all pending changes
    fn save(&self) -> InvenGoResult<()>;

    /// Numeric value of a cell
    fn read_value(&self, address: &CellAddress) -> InvenGoResult<i64> {
        match self.read(address)? {
            None => Err(InvenGoError::address_not_found(address)),
            Some(value) => value.as_number().ok_or_else(|| {
                InvenGoError::Storage(format!("{} does not hold a number", address))
            }),
        }
    }

    /// Text of a cell; numbers are rendered, empty cells give `None`
    fn read_text(&self, address: &CellAddress) -> InvenGoResult<Option<String>> {
        Ok(self.read(address)?.map(|value| value.display()))
    }

    /// First row at or after `from` whose `column` cell is empty
    fn first_free_row(&self, sheet: Sheet, column: char, from: u32) -> InvenGoResult<u32> {
        let mut row = from;
        while self.read(&CellAddress::new(sheet, column, row))?.is_some() {
            row += 1;
        }
        Ok(row)
    }
}
