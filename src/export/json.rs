//! JSON export of a full ledger snapshot

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{AccountsSummary, CommittedBill, Customer, Expense, Item};
use crate::services::{AccountsLedger, BillArchive, CustomerLedger, InventoryLedger};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Every ledger at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub bill_counter: u64,
    pub items: Vec<Item>,
    pub customers: Vec<Customer>,
    pub summary: AccountsSummary,
    pub expenses: Vec<Expense>,
    pub bills: Vec<CommittedBill>,

    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub item_count: usize,
    pub customer_count: usize,
    pub bill_count: usize,

    /// Items whose balance went negative through a shortage override
    pub oversold_items: Vec<String>,
}

impl Snapshot {
    /// Collect a snapshot from storage
    pub fn from_storage(storage: &Storage) -> InvenGoResult<Self> {
        let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;
        let customers = CustomerLedger::new(&storage.cells, &storage.journal);
        let accounts = AccountsLedger::new(&storage.cells, &storage.journal);

        let items = inventory.items()?;
        let bills = BillArchive::new(&storage.cells).all()?;
        let customer_list = customers.list()?;

        let metadata = SnapshotMetadata {
            item_count: items.len(),
            customer_count: customer_list.len(),
            bill_count: bills.len(),
            oversold_items: items
                .iter()
                .filter(|item| item.balance() < 0)
                .map(|item| item.code.clone())
                .collect(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            bill_counter: customers.current_counter()?,
            items,
            customers: customer_list,
            summary: accounts.get_summary()?,
            expenses: accounts.list_expenses()?,
            bills,
            metadata,
        })
    }

    /// Check the schema version and that customers only reference known bills
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut codes = HashSet::new();
        for item in &self.items {
            if !codes.insert(item.code.as_str()) {
                return Err(format!("Item code {} appears twice", item.code));
            }
        }

        let numbers: HashSet<&str> = self.bills.iter().map(|b| b.number.as_str()).collect();
        for customer in &self.customers {
            if let Some(missing) = customer.bills.iter().find(|n| !numbers.contains(n.as_str())) {
                return Err(format!(
                    "Customer {} references unknown bill {}",
                    customer.phone, missing
                ));
            }
        }

        Ok(())
    }
}

/// Export a full snapshot as JSON
pub fn export_snapshot_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> InvenGoResult<()> {
    let snapshot = Snapshot::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &snapshot)
    } else {
        serde_json::to_writer(writer, &snapshot)
    }
    .map_err(|e| InvenGoError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON snapshot and validate it
pub fn read_snapshot_json(json_str: &str) -> InvenGoResult<Snapshot> {
    let snapshot: Snapshot =
        serde_json::from_str(json_str).map_err(|e| InvenGoError::Import(e.to_string()))?;
    snapshot.validate().map_err(InvenGoError::Import)?;
    Ok(snapshot)
}
