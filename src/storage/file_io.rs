//! File I/O utilities with atomic writes
//!
//! The workbook is always written whole: serialized to a sibling temp file,
//! synced, then renamed over the previous copy.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::InvenGoError;

/// Read JSON from a file that must exist
pub fn read_json<T, P>(path: P) -> Result<T, InvenGoError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InvenGoError::Storage(format!(
                "{} does not exist; run `invengo init` first",
                path.display()
            ))
        } else {
            InvenGoError::Io(format!("Failed to open {}: {}", path.display(), e))
        }
    })?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| InvenGoError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// Any failure surfaces as [`InvenGoError::Io`]; nothing is retried.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), InvenGoError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            InvenGoError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| InvenGoError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| InvenGoError::Io(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| InvenGoError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| InvenGoError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        InvenGoError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Snapshot {
        name: String,
        value: i64,
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let result: Result<Snapshot, _> = read_json(temp_dir.path().join("workbook.json"));
        assert!(matches!(result, Err(InvenGoError::Storage(_))));
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("workbook.json");

        let data = Snapshot {
            name: "stock".into(),
            value: 42,
        };
        write_json_atomic(&path, &data).unwrap();

        let loaded: Snapshot = read_json(&path).unwrap();
        assert_eq!(loaded, data);
        assert!(!temp_dir.path().join("nested").join("workbook.json.tmp").exists());
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = write_json_atomic(blocker.join("workbook.json"), &Snapshot::default());
        assert!(matches!(result, Err(InvenGoError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("workbook.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Snapshot, _> = read_json(&path);
        assert!(matches!(result, Err(InvenGoError::Storage(_))));
    }
}
