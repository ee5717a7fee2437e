//! YAML export of a full ledger snapshot

use std::io::Write;

use crate::error::{InvenGoError, InvenGoResult};
use crate::export::json::Snapshot;
use crate::storage::Storage;

fn export_err(e: impl ToString) -> InvenGoError {
    InvenGoError::Export(e.to_string())
}

/// Export a full snapshot as YAML, preceded by a comment header
pub fn export_snapshot_yaml<W: Write>(storage: &Storage, writer: &mut W) -> InvenGoResult<()> {
    let snapshot = Snapshot::from_storage(storage)?;

    writeln!(writer, "# InvenGo ledger snapshot").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", snapshot.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", snapshot.app_version).map_err(export_err)?;
    writeln!(writer, "# Amounts are in paise; stock in units.").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &snapshot).map_err(export_err)?;

    Ok(())
}

/// Read back a YAML snapshot and validate it
pub fn read_snapshot_yaml(yaml_str: &str) -> InvenGoResult<Snapshot> {
    let snapshot: Snapshot =
        serde_yaml::from_str(yaml_str).map_err(|e| InvenGoError::Import(e.to_string()))?;
    snapshot.validate().map_err(InvenGoError::Import)?;
    Ok(snapshot)
}
