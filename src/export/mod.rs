//! Export module for InvenGo
//!
//! - CSV: stock and expense tables (spreadsheet-compatible)
//! - JSON: machine-readable snapshot of every ledger
//! - YAML: human-readable snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, export_stock_csv};
pub use json::{export_snapshot_json, Snapshot, EXPORT_SCHEMA_VERSION};
pub use yaml::export_snapshot_yaml;
