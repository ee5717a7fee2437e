//! Ledger journal for InvenGo
//!
//! Every ledger mutation (a sale against an item, a customer update, a
//! payment posted to the accounts) is appended to `ledger.log` as one JSON
//! line, with the record before and after the change.
//!
//! The workbook itself is only saved at the end of a bill. If the process
//! dies in between, the journal shows which steps were applied in memory
//! and which were not. It is read by `invengo history` and is never replayed.
//!
//! ```rust,ignore
//! use invengo::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.ledger_log());
//! let entry = AuditEntry::update(EntityType::Item, "ALM050", Some("Almonds".into()), &before, &after);
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
