//! Stock display formatting
//!
//! Catalog tables, single-item details, the size index and price checks.

use std::collections::BTreeMap;

use crate::models::Item;
use crate::services::SizePrice;

/// Format items as a stock table with balances
pub fn format_stock_table(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items found.\n".to_string();
    }

    let name_width = items
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 28);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>7}  {:>9}  {:>9}  {:>6}  {:>6}  {:>7}\n",
        "Code",
        "Name",
        "Size",
        "MRP",
        "Price",
        "In",
        "Sold",
        "Balance",
        name_width = name_width,
    ));
    output.push_str(&"-".repeat(name_width + 70));
    output.push('\n');

    for item in items {
        let marker = if item.balance() < 0 { " !" } else { "" };
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>7}  {:>9}  {:>9}  {:>6}  {:>6}  {:>7}{}\n",
            item.code,
            truncate(&item.name, name_width),
            item.size_label(),
            item.mrp.to_string(),
            item.price.to_string(),
            item.stock_in,
            item.stock_sold,
            item.balance(),
            marker,
            name_width = name_width,
        ));
    }

    output
}

/// Format the catalog grouped by category
pub fn format_stock_by_category(groups: &BTreeMap<String, Vec<Item>>) -> String {
    if groups.is_empty() {
        return "No items found.\n".to_string();
    }

    let mut output = String::new();
    for (category, items) in groups {
        let units: i64 = items.iter().map(Item::balance).sum();
        output.push_str(&format!(
            "{} ({} items, {} units)\n",
            category,
            items.len(),
            units
        ));
        output.push_str(&format_stock_table(items));
        output.push('\n');
    }
    output
}

/// Format one item's details
pub fn format_item_details(item: &Item, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Item: {} ({})\n", item.name, item.code));
    output.push_str(&format!("  Base code:  {}\n", item.base_code));
    output.push_str(&format!("  Category:   {}\n", item.category));
    output.push_str(&format!("  Size:       {}\n", item.size_label()));
    output.push_str(&format!("  MRP:        {}\n", item.mrp.format_with_symbol(symbol)));
    output.push_str(&format!("  Price:      {}\n", item.price.format_with_symbol(symbol)));
    output.push_str(&format!("  Stock in:   {}\n", item.stock_in));
    output.push_str(&format!("  Sold:       {}\n", item.stock_sold));
    output.push_str(&format!("  Balance:    {}\n", item.balance()));

    if item.balance() < 0 {
        output.push_str(&format!(
            "  Oversold by {} units\n",
            item.balance().unsigned_abs()
        ));
    }

    output
}

/// Format a price check: name, size, MRP and selling price on one line
pub fn format_price_check(item: &Item, symbol: &str) -> String {
    format!(
        "{} {} ({}): MRP {}, price {}\n",
        item.code,
        item.name,
        item.size_label(),
        item.mrp.format_with_symbol(symbol),
        item.price.format_with_symbol(symbol)
    )
}

/// Format the size index, one block per pack size
pub fn format_size_index(index: &BTreeMap<u32, Vec<SizePrice>>, symbol: &str) -> String {
    if index.is_empty() {
        return "No items found.\n".to_string();
    }

    let mut output = String::new();
    for (size, entries) in index {
        output.push_str(&format!("{}GM\n", size));
        for entry in entries {
            output.push_str(&format!(
                "  {:<8}  {:<24}  {:>10}  {:>10}\n",
                entry.code,
                truncate(&entry.name, 24),
                entry.mrp.format_with_symbol(symbol),
                entry.price.format_with_symbol(symbol)
            ));
        }
    }
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
