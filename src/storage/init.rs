//! Workbook initialization
//!
//! Lays out headers and zeroed ledgers for a fresh installation. An existing
//! workbook is never touched.

use tracing::info;

use crate::config::paths::InvenGoPaths;
use crate::error::InvenGoResult;
use crate::models::{Accumulator, CellAddress, CellValue, Sheet};

use super::file_io::write_json_atomic;
use super::layout::{accounts, customers, stock};
use super::workbook::Workbook;

/// Create the workbook if it does not exist yet
///
/// Returns `true` when a new workbook was written.
pub fn initialize_workbook(paths: &InvenGoPaths) -> InvenGoResult<bool> {
    paths.ensure_directories()?;

    let path = paths.workbook_file();
    if path.exists() {
        return Ok(false);
    }

    write_json_atomic(&path, &blank_workbook())?;
    info!(path = %path.display(), "created workbook");
    Ok(true)
}

/// A workbook with headers, a zero bill counter and zeroed account totals
pub fn blank_workbook() -> Workbook {
    let mut book = Workbook::default();

    for (column, title) in stock::HEADERS {
        book.set(
            &CellAddress::new(Sheet::Stock, column, stock::HEADER_ROW),
            CellValue::text(title),
        );
    }

    for (column, title) in customers::HEADERS {
        book.set(
            &CellAddress::new(Sheet::Customers, column, customers::HEADER_ROW),
            CellValue::text(title),
        );
    }
    book.set(
        &CellAddress::new(
            Sheet::Customers,
            customers::COUNTER_LABEL_COLUMN,
            customers::COUNTER_ROW,
        ),
        CellValue::text("Bill Counter"),
    );
    book.set(
        &CellAddress::new(Sheet::Customers, customers::COUNTER_COLUMN, customers::COUNTER_ROW),
        CellValue::Ledger(Accumulator::new(0)),
    );

    for (row, label) in accounts::TOTAL_LABELS {
        book.set(
            &CellAddress::new(Sheet::Accounts, accounts::LABEL_COLUMN, row),
            CellValue::text(label),
        );
        book.set(
            &CellAddress::new(Sheet::Accounts, accounts::VALUE_COLUMN, row),
            CellValue::Ledger(Accumulator::new(0)),
        );
    }
    for (column, title) in [
        (accounts::EXPENSE_AMOUNT, "Expense"),
        (accounts::EXPENSE_DESCRIPTION, "Description"),
        (accounts::EXPENSE_DATE, "Date"),
    ] {
        book.set(
            &CellAddress::new(Sheet::Accounts, column, accounts::EXPENSE_HEADER_ROW),
            CellValue::text(title),
        );
    }

    book
}
