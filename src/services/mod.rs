//! Service layer for InvenGo
//!
//! The ledgers, the bill builder and committer, and the read-only bill
//! archive. Every service borrows the one shared [`CellStore`] and the
//! ledger journal; none of them owns state that outlives a command.
//!
//! [`CellStore`]: crate::storage::CellStore

pub mod accounts;
pub mod bill_archive;
pub mod bill_builder;
pub mod bill_committer;
pub mod customer;
pub mod import;
pub mod inventory;

pub use accounts::AccountsLedger;
pub use bill_archive::BillArchive;
pub use bill_builder::{
    BillBuilder, BuildOutcome, BuilderEvent, BuilderState, InputSource, Prompt, ScriptedInput,
    Shortage, ShortageKind,
};
pub use bill_committer::BillCommitter;
pub use customer::CustomerLedger;
pub use import::{CatalogImport, ImportResult, ImportStatus};
pub use inventory::{InventoryLedger, SizePrice};
