//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{InvenGoError, InvenGoResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Snapshot format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SnapshotFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every ledger to one file
    All {
        /// Output file path
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: SnapshotFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the stock table to CSV
    Stock {
        output: PathBuf,
    },

    /// Export the expense log to CSV
    Expenses {
        output: PathBuf,
    },

    /// Show what an export would contain without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> InvenGoResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            write_to(&output, |writer| match format {
                SnapshotFormat::Json => json::export_snapshot_json(storage, writer, pretty),
                SnapshotFormat::Yaml => yaml::export_snapshot_yaml(storage, writer),
            })?;
            println!("Full snapshot exported to: {}", output.display());
        }
        ExportCommands::Stock { output } => {
            write_to(&output, |writer| csv::export_stock_csv(storage, writer))?;
            println!("Stock exported to: {}", output.display());
        }
        ExportCommands::Expenses { output } => {
            write_to(&output, |writer| csv::export_expenses_csv(storage, writer))?;
            println!("Expenses exported to: {}", output.display());
        }
        ExportCommands::Info => {
            let snapshot = json::Snapshot::from_storage(storage)?;

            println!("Export Information");
            println!("==================\n");
            println!("Schema Version: {}", snapshot.schema_version);
            println!("App Version:    {}", snapshot.app_version);
            println!();
            println!("Data Summary:");
            println!("  Items:         {}", snapshot.metadata.item_count);
            println!("  Customers:     {}", snapshot.metadata.customer_count);
            println!("  Bills:         {}", snapshot.metadata.bill_count);
            println!("  Expenses:      {}", snapshot.expenses.len());
            if !snapshot.metadata.oversold_items.is_empty() {
                println!(
                    "  Oversold:      {}",
                    snapshot.metadata.oversold_items.join(", ")
                );
            }

            println!("\nExamples:");
            println!("  invengo export all snapshot.json --pretty");
            println!("  invengo export all snapshot.yaml --format yaml");
            println!("  invengo export stock stock.csv");
        }
    }

    Ok(())
}

fn write_to<F>(output: &Path, export: F) -> InvenGoResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> InvenGoResult<()>,
{
    let file = File::create(output).map_err(|e| {
        InvenGoError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer
        .flush()
        .map_err(|e| InvenGoError::Export(e.to_string()))?;
    Ok(())
}
