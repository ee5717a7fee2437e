//! Path management for InvenGo
//!
//! ## Path Resolution Order
//!
//! 1. `INVENGO_DATA_DIR` environment variable (if set)
//! 2. The platform data directory for `invengo` (e.g. `~/.local/share/invengo`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::InvenGoError;

/// Manages all paths used by InvenGo
#[derive(Debug, Clone)]
pub struct InvenGoPaths {
    /// Base directory for all InvenGo data
    base_dir: PathBuf,
}

impl InvenGoPaths {
    /// Create a new InvenGoPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, InvenGoError> {
        let base_dir = if let Ok(custom) = std::env::var("INVENGO_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "invengo")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    InvenGoError::Config("Could not determine a data directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create InvenGoPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the workbook
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory where rendered outbound messages are dropped
    pub fn outbox_dir(&self) -> PathBuf {
        self.base_dir.join("outbox")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Append-only journal of ledger mutations
    pub fn ledger_log(&self) -> PathBuf {
        self.base_dir.join("ledger.log")
    }

    /// The persisted workbook (all sheets in one document)
    pub fn workbook_file(&self) -> PathBuf {
        self.data_dir().join("workbook.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), InvenGoError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| InvenGoError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| InvenGoError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.outbox_dir())
            .map_err(|e| InvenGoError::Io(format!("Failed to create outbox directory: {}", e)))?;

        Ok(())
    }

    /// Check if a workbook has been created
    pub fn is_initialized(&self) -> bool {
        self.workbook_file().exists()
    }
}
