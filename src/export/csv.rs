//! CSV export of the stock and expense tables

use std::io::Write;

use csv::Writer;

use crate::error::{InvenGoError, InvenGoResult};
use crate::services::{AccountsLedger, InventoryLedger};
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> InvenGoError {
    InvenGoError::Export(e.to_string())
}

/// Export every catalog item with its stock position
pub fn export_stock_csv<W: Write>(storage: &Storage, writer: &mut W) -> InvenGoResult<()> {
    let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;
    let mut out = Writer::from_writer(writer);

    out.write_record([
        "Base Code", "Category", "Code", "Name", "Size", "Unit", "MRP", "Price", "Stock In",
        "Sold", "Balance",
    ])
    .map_err(export_err)?;

    for item in inventory.items()? {
        out.write_record([
            item.base_code.clone(),
            item.category.clone(),
            item.code.clone(),
            item.name.clone(),
            item.size.to_string(),
            item.unit.clone(),
            item.mrp.to_string(),
            item.price.to_string(),
            item.stock_in.to_string(),
            item.stock_sold.to_string(),
            item.balance().to_string(),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(export_err)?;
    Ok(())
}

/// Export the expense log
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: &mut W) -> InvenGoResult<()> {
    let accounts = AccountsLedger::new(&storage.cells, &storage.journal);
    let mut out = Writer::from_writer(writer);

    out.write_record(["Date", "Description", "Amount"])
        .map_err(export_err)?;
    for expense in accounts.list_expenses()? {
        let date = expense
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        out.write_record([date, expense.description, expense.amount.to_string()])
            .map_err(export_err)?;
    }

    out.flush().map_err(export_err)?;
    Ok(())
}
