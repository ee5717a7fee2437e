//! InvenGo - inventory, billing and ledgers for a single retail store
//!
//! # Architecture
//!
//! - `config`: data directory and shop settings
//! - `error`: the crate error type
//! - `models`: items, bills, customers, accounts and cell addressing
//! - `storage`: the cell store and its file-backed workbook
//! - `audit`: append-only journal of ledger mutations
//! - `services`: inventory, customer and accounts ledgers, the bill builder,
//!   committer and archive, catalog import
//! - `display`: console tables and outbound bill messages
//! - `export`: CSV, JSON and YAML export
//! - `delivery`: hands finished bill messages to an output channel
//! - `cli`: command handlers for the `invengo` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use invengo::config::{InvenGoPaths, Settings};
//! use invengo::services::InventoryLedger;
//! use invengo::storage::Storage;
//!
//! let paths = InvenGoPaths::new()?;
//! let storage = Storage::open(paths)?;
//! let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;
//! println!("{}", inventory.lookup("ALM050")?.balance());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{InvenGoError, InvenGoResult};
