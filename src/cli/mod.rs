//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer.

pub mod accounts;
pub mod bill;
pub mod export;
pub mod history;
pub mod import;
pub mod stock;

pub use accounts::{handle_accounts_command, AccountsCommands};
pub use bill::{handle_bill_command, BillCommands, ConsoleInput};
pub use export::{handle_export_command, ExportCommands};
pub use history::handle_history_command;
pub use import::handle_import_command;
pub use stock::{handle_stock_command, StockCommands};
