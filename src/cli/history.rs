//! CLI command for reading the ledger journal

use crate::audit::EntityType;
use crate::error::{InvenGoError, InvenGoResult};
use crate::storage::Storage;

/// Print the most recent journal entries, newest last
pub fn handle_history_command(
    storage: &Storage,
    limit: usize,
    entity: Option<&str>,
) -> InvenGoResult<()> {
    let entity_type = entity
        .map(|e| {
            EntityType::parse(e).ok_or_else(|| {
                InvenGoError::Validation(format!(
                    "Unknown entity type '{}'. Valid types: item, bill, customer, accounts, expense, counter",
                    e
                ))
            })
        })
        .transpose()?;

    let entries = storage.journal.read_recent(limit, entity_type)?;
    if entries.is_empty() {
        println!("No ledger history yet.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
