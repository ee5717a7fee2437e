//! Append-only writer for the ledger journal
//!
//! Each entry is one JSON line, flushed as soon as it is written.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{InvenGoError, InvenGoResult};

use super::entry::{AuditEntry, EntityType};

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush it
    pub fn log(&self, entry: &AuditEntry) -> InvenGoResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| InvenGoError::Io(format!("Failed to open ledger journal: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| InvenGoError::Json(format!("Failed to serialize journal entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| InvenGoError::Io(format!("Failed to write journal entry: {}", e)))?;

        file.flush()
            .map_err(|e| InvenGoError::Io(format!("Failed to flush ledger journal: {}", e)))?;

        Ok(())
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> InvenGoResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| InvenGoError::Io(format!("Failed to open ledger journal: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                InvenGoError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                InvenGoError::Json(format!(
                    "Failed to parse journal entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, optionally restricted to one ledger
    pub fn read_recent(
        &self,
        count: usize,
        entity_type: Option<EntityType>,
    ) -> InvenGoResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        if let Some(kind) = entity_type {
            entries.retain(|e| e.entity_type == kind);
        }
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("ledger.log"));
        (logger, temp_dir)
    }

    fn sale_entry(code: &str, before: i64, after: i64) -> AuditEntry {
        AuditEntry::update(
            EntityType::Item,
            code,
            None,
            &json!({"stock_sold": before}),
            &json!({"stock_sold": after}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&sale_entry("ALM050", 10, 12)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].entity_id, "ALM050");
    }

    #[test]
    fn test_read_recent_filters_by_ledger() {
        let (logger, _temp) = create_test_logger();
        for i in 0..5 {
            logger.log(&sale_entry(&format!("ITEM{}", i), i, i + 1)).unwrap();
        }
        logger
            .log(&AuditEntry::create(
                EntityType::Bill,
                "INV0001",
                None,
                &json!({"number": "INV0001"}),
            ))
            .unwrap();

        let recent = logger.read_recent(2, Some(EntityType::Item)).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "ITEM3");
        assert_eq!(recent[1].entity_id, "ITEM4");

        let all = logger.read_recent(100, None).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[5].entity_type, EntityType::Bill);
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger.log(&sale_entry("ALM050", 0, 1)).unwrap();

        let reopened = AuditLogger::new(temp.path().join("ledger.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
