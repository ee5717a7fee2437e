//! Stock CLI commands
//!
//! Catalog views, new items and restocking.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{
    format_item_details, format_price_check, format_size_index, format_stock_by_category,
    format_stock_table,
};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{Money, NewItem};
use crate::services::InventoryLedger;
use crate::storage::Storage;

/// Stock subcommands
#[derive(Subcommand)]
pub enum StockCommands {
    /// List every item with its balance
    List {
        /// Only items in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List items grouped by category
    Categories,
    /// Show one item
    Show {
        code: String,
    },
    /// Show prices grouped by pack size
    Sizes,
    /// Check the MRP and price of an item
    Price {
        code: String,
    },
    /// Add a new item to the catalog
    Add {
        /// Item code, e.g. ALM050
        code: String,
        /// Item name
        name: String,
        #[arg(short, long)]
        category: String,
        /// Pack size in grams
        #[arg(short, long)]
        size: u32,
        /// Selling price (e.g. "55" or "55.50")
        #[arg(short, long)]
        price: String,
        /// MRP; defaults to the selling price
        #[arg(short, long)]
        mrp: Option<String>,
        /// Product family code; defaults to the code without its size digits
        #[arg(short, long)]
        base_code: Option<String>,
        #[arg(short, long, default_value = "GM")]
        unit: String,
        /// Opening stock
        #[arg(long, default_value = "0")]
        stock: i64,
    },
    /// Record received units for an item
    Restock {
        code: String,
        quantity: u32,
    },
}

/// Handle a stock command
pub fn handle_stock_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StockCommands,
) -> InvenGoResult<()> {
    let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;
    let symbol = &settings.currency_symbol;

    match cmd {
        StockCommands::List { category } => {
            let mut items = inventory.items()?;
            if let Some(category) = category {
                let wanted = category.trim().to_lowercase();
                items.retain(|item| item.category.to_lowercase() == wanted);
            }
            print!("{}", format_stock_table(&items));
        }

        StockCommands::Categories => {
            print!("{}", format_stock_by_category(&inventory.categories()?));
        }

        StockCommands::Show { code } => {
            print!("{}", format_item_details(&inventory.lookup(&code)?, symbol));
        }

        StockCommands::Sizes => {
            print!("{}", format_size_index(&inventory.size_index()?, symbol));
        }

        StockCommands::Price { code } => {
            print!("{}", format_price_check(&inventory.lookup(&code)?, symbol));
        }

        StockCommands::Add {
            code,
            name,
            category,
            size,
            price,
            mrp,
            base_code,
            unit,
            stock,
        } => {
            let price = parse_price(&price)?;
            let mrp = match mrp {
                Some(mrp) => parse_price(&mrp)?,
                None => price,
            };
            let base_code = base_code.unwrap_or_else(|| {
                code.trim()
                    .trim_end_matches(|c: char| c.is_ascii_digit())
                    .to_string()
            });

            let item = inventory.add_item(NewItem {
                base_code,
                category,
                code,
                name,
                size,
                unit,
                mrp,
                price,
                initial_stock: stock,
            })?;
            storage.save()?;

            println!("Added item: {} ({})", item.name, item.code);
            println!("  Size:    {}", item.size_label());
            println!("  Price:   {}", item.price.format_with_symbol(symbol));
            println!("  Stock:   {}", item.balance());
        }

        StockCommands::Restock { code, quantity } => {
            let item = inventory.add_stock(&code, quantity)?;
            storage.save()?;
            println!(
                "Restocked {} by {}. Balance: {}",
                item.code,
                quantity,
                item.balance()
            );
        }
    }

    Ok(())
}

fn parse_price(value: &str) -> InvenGoResult<Money> {
    Money::parse(value).map_err(|e| {
        InvenGoError::Validation(format!(
            "Invalid price format: '{}'. Use format like '55' or '55.50'. Error: {}",
            value, e
        ))
    })
}
