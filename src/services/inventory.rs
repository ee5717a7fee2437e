//! Inventory ledger
//!
//! Keeps an in-memory catalog built by scanning the stock sheet once, and
//! routes every stock mutation through the cell store's accumulators. The
//! cached item is refreshed from the store after each mutation so that
//! `lookup` never hands out a stale balance.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::{debug, info};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{Accumulator, CellValue, Item, Money, NewItem, Sheet};
use crate::storage::layout::{stock, stock_cell};
use crate::storage::{row_number, row_text, CellStore, Row};

/// One entry of the size index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizePrice {
    pub code: String,
    pub name: String,
    pub mrp: Money,
    pub price: Money,
}

/// Catalog and stock bookkeeping over the `Sales & Stocks` sheet
pub struct InventoryLedger<'a> {
    cells: &'a dyn CellStore,
    journal: &'a AuditLogger,
    catalog: RwLock<BTreeMap<String, Item>>,
}

impl<'a> InventoryLedger<'a> {
    /// Build the ledger and scan the catalog
    pub fn load(cells: &'a dyn CellStore, journal: &'a AuditLogger) -> InvenGoResult<Self> {
        let ledger = Self {
            cells,
            journal,
            catalog: RwLock::new(BTreeMap::new()),
        };
        ledger.refresh()?;
        Ok(ledger)
    }

    /// Rebuild the in-memory catalog from the store
    pub fn refresh(&self) -> InvenGoResult<()> {
        let mut items = BTreeMap::new();
        let last = self.cells.max_row(Sheet::Stock)?;

        for row_no in stock::FIRST_ROW..=last {
            let Some(row) = self.cells.row(Sheet::Stock, row_no)? else {
                continue;
            };
            if let Some(item) = parse_item(&row, row_no)? {
                items.insert(item.code.clone(), item);
            }
        }

        debug!(items = items.len(), "catalog loaded");
        *self.write_catalog()? = items;
        Ok(())
    }

    /// Find an item by code (case-insensitive)
    pub fn lookup(&self, code: &str) -> InvenGoResult<Item> {
        let code = code.trim().to_uppercase();
        self.read_catalog()?
            .get(&code)
            .cloned()
            .ok_or(InvenGoError::UnknownCode(code))
    }

    pub fn contains(&self, code: &str) -> InvenGoResult<bool> {
        Ok(self
            .read_catalog()?
            .contains_key(&code.trim().to_uppercase()))
    }

    /// All items in sheet order
    pub fn items(&self) -> InvenGoResult<Vec<Item>> {
        let mut items: Vec<Item> = self.read_catalog()?.values().cloned().collect();
        items.sort_by_key(|item| item.row);
        Ok(items)
    }

    /// Items grouped by category, each group in sheet order
    pub fn categories(&self) -> InvenGoResult<BTreeMap<String, Vec<Item>>> {
        let mut groups: BTreeMap<String, Vec<Item>> = BTreeMap::new();
        for item in self.items()? {
            groups.entry(item.category.clone()).or_default().push(item);
        }
        Ok(groups)
    }

    /// Prices available at each pack size
    pub fn size_index(&self) -> InvenGoResult<BTreeMap<u32, Vec<SizePrice>>> {
        let mut index: BTreeMap<u32, Vec<SizePrice>> = BTreeMap::new();
        for item in self.items()? {
            index.entry(item.size).or_default().push(SizePrice {
                code: item.code,
                name: item.name,
                mrp: item.mrp,
                price: item.price,
            });
        }
        Ok(index)
    }

    /// Debit `quantity` units from an item's stock
    ///
    /// Does not check the balance; shortage policy belongs to the bill builder.
    pub fn record_sale(&self, code: &str, quantity: u32) -> InvenGoResult<Item> {
        let before = self.lookup(code)?;
        let sold = self.cells.accumulate(
            &stock_cell(stock::SOLD, before.row),
            i64::from(quantity),
        )?;

        let mut after = before.clone();
        after.stock_sold = sold;
        self.replace_cached(after.clone())?;

        debug!(code = %after.code, quantity, balance = after.balance(), "sale recorded");
        self.journal.log(&AuditEntry::update(
            EntityType::Item,
            &after.code,
            Some(after.name.clone()),
            &before,
            &after,
        ))?;
        Ok(after)
    }

    /// Credit `quantity` received units to an item
    pub fn add_stock(&self, code: &str, quantity: u32) -> InvenGoResult<Item> {
        if quantity == 0 {
            return Err(InvenGoError::Validation(
                "Restock quantity must be positive".into(),
            ));
        }

        let before = self.lookup(code)?;
        let stock_in = self.cells.accumulate(
            &stock_cell(stock::STOCK_IN, before.row),
            i64::from(quantity),
        )?;

        let mut after = before.clone();
        after.stock_in = stock_in;
        self.replace_cached(after.clone())?;

        info!(code = %after.code, quantity, balance = after.balance(), "stock added");
        self.journal.log(&AuditEntry::update(
            EntityType::Item,
            &after.code,
            Some(after.name.clone()),
            &before,
            &after,
        ))?;
        Ok(after)
    }

    /// Append a new item with its opening stock and nothing sold
    pub fn add_item(&self, new_item: NewItem) -> InvenGoResult<Item> {
        let stock_in = Accumulator::new(new_item.initial_stock);
        self.insert_item(new_item, stock_in, Accumulator::new(0))
    }

    /// Append a new item with existing stock histories (catalog import)
    pub fn insert_item(
        &self,
        new_item: NewItem,
        stock_in: Accumulator,
        sold: Accumulator,
    ) -> InvenGoResult<Item> {
        let new_item = new_item.normalized();
        new_item
            .validate()
            .map_err(|e| InvenGoError::Validation(e.to_string()))?;

        if self.contains(&new_item.code)? {
            return Err(InvenGoError::DuplicateCode(new_item.code));
        }

        let row = self.cells.append_row(
            Sheet::Stock,
            vec![
                (stock::BASE_CODE, CellValue::text(&new_item.base_code)),
                (stock::CATEGORY, CellValue::text(&new_item.category)),
                (stock::CODE, CellValue::text(&new_item.code)),
                (stock::NAME, CellValue::text(&new_item.name)),
                (stock::SIZE, CellValue::Number(i64::from(new_item.size))),
                (stock::UNIT, CellValue::text(&new_item.unit)),
                (stock::MRP, CellValue::Number(new_item.mrp.paise())),
                (stock::PRICE, CellValue::Number(new_item.price.paise())),
                (stock::STOCK_IN, CellValue::Ledger(stock_in)),
                (stock::SOLD, CellValue::Ledger(sold)),
            ],
        )?;

        self.refresh()?;
        let item = self.lookup(&new_item.code)?;

        info!(code = %item.code, row, "item added");
        self.journal.log(&AuditEntry::create(
            EntityType::Item,
            &item.code,
            Some(item.name.clone()),
            &item,
        ))?;
        Ok(item)
    }

    /// Re-read one item's row into the cache
    fn replace_cached(&self, item: Item) -> InvenGoResult<()> {
        let fresh = match self.cells.row(Sheet::Stock, item.row)? {
            Some(row) => parse_item(&row, item.row)?.unwrap_or(item),
            None => item,
        };
        self.write_catalog()?.insert(fresh.code.clone(), fresh);
        Ok(())
    }

    fn read_catalog(
        &self,
    ) -> InvenGoResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, Item>>> {
        self.catalog
            .read()
            .map_err(|e| InvenGoError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_catalog(
        &self,
    ) -> InvenGoResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Item>>> {
        self.catalog
            .write()
            .map_err(|e| InvenGoError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

/// Parse one stock row; rows without a code are skipped
fn parse_item(row: &Row, row_no: u32) -> InvenGoResult<Option<Item>> {
    let code = row_text(row, stock::CODE).to_uppercase();
    if code.is_empty() {
        return Ok(None);
    }

    let number = |column: char, what: &str| {
        row_number(row, column).ok_or_else(|| {
            InvenGoError::Storage(format!(
                "{} row {}: {} of {} is not a number",
                Sheet::Stock,
                row_no,
                what,
                code
            ))
        })
    };

    let size = u32::try_from(number(stock::SIZE, "size")?).map_err(|_| {
        InvenGoError::Storage(format!("{} row {}: bad size", Sheet::Stock, row_no))
    })?;

    Ok(Some(Item {
        base_code: row_text(row, stock::BASE_CODE),
        category: row_text(row, stock::CATEGORY),
        name: row_text(row, stock::NAME),
        unit: row_text(row, stock::UNIT),
        size,
        mrp: Money::from_paise(number(stock::MRP, "MRP")?),
        price: Money::from_paise(number(stock::PRICE, "price")?),
        stock_in: number(stock::STOCK_IN, "stock")?,
        stock_sold: number(stock::SOLD, "sold")?,
        row: row_no,
        code,
    }))
}
