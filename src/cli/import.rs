//! CLI command handler for catalog import
//!
//! Reads item rows from a CSV file, previews them against the catalog and
//! inserts the new ones.

use std::fs::File;
use std::path::Path;

use crate::error::{InvenGoError, InvenGoResult};
use crate::services::{CatalogImport, ImportStatus, InventoryLedger};
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &str, dry_run: bool) -> InvenGoResult<()> {
    let path = Path::new(file);
    if !path.exists() {
        return Err(InvenGoError::Import(format!("File not found: {}", file)));
    }
    let reader = File::open(path)
        .map_err(|e| InvenGoError::Import(format!("Failed to read file: {}", e)))?;

    let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;
    let import = CatalogImport::new(&inventory);

    let parsed = import.parse_reader(reader)?;
    if parsed.is_empty() {
        println!("No items found in CSV file.");
        return Ok(());
    }

    let preview = import.generate_preview(parsed)?;
    let new_count = preview.iter().filter(|e| e.status == ImportStatus::New).count();
    let dup_count = preview
        .iter()
        .filter(|e| e.status == ImportStatus::Duplicate)
        .count();
    let err_count = preview
        .iter()
        .filter(|e| matches!(e.status, ImportStatus::Error(_)))
        .count();

    println!("Import Preview for '{}'", file);
    println!("{}", "=".repeat(40));
    println!("  New items:          {}", new_count);
    println!("  Duplicates (skip):  {}", dup_count);
    println!("  Errors:             {}", err_count);
    println!();

    if new_count == 0 || dry_run {
        if new_count == 0 {
            println!("No new items to import.");
        }
        return Ok(());
    }

    let result = import.import_from_preview(&preview)?;
    storage.save()?;

    println!("Import Complete!");
    println!("  Imported:    {}", result.imported);
    println!("  Skipped:     {}", result.duplicates_skipped);
    if !result.error_messages.is_empty() {
        println!("  Errors:      {}", result.errors);
        for (row, msg) in &result.error_messages {
            println!("    Row {}: {}", row, msg);
        }
    }

    Ok(())
}
