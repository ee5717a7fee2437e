//! Storage layer for InvenGo
//!
//! One JSON workbook holds every sheet. It is loaded whole, mutated in
//! memory through [`CellStore`], and saved atomically.

pub mod cell_store;
pub mod file_io;
pub mod init;
pub mod layout;
pub mod workbook;

pub use cell_store::{row_number, row_text, CellStore, Row};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_workbook;
pub use workbook::{Workbook, WorkbookStore};

use crate::audit::AuditLogger;
use crate::config::paths::InvenGoPaths;
use crate::error::InvenGoError;

/// Storage coordinator: the workbook plus the ledger journal
pub struct Storage {
    paths: InvenGoPaths,
    pub cells: WorkbookStore,
    pub journal: AuditLogger,
}

impl Storage {
    pub fn new(paths: InvenGoPaths) -> Result<Self, InvenGoError> {
        paths.ensure_directories()?;

        Ok(Self {
            cells: WorkbookStore::new(paths.workbook_file()),
            journal: AuditLogger::new(paths.ledger_log()),
            paths,
        })
    }

    /// Open an initialized workbook and load it
    pub fn open(paths: InvenGoPaths) -> Result<Self, InvenGoError> {
        let storage = Self::new(paths)?;
        storage.cells.load()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &InvenGoPaths {
        &self.paths
    }

    pub fn save(&self) -> Result<(), InvenGoError> {
        self.cells.save()
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
