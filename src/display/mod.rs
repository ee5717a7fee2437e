//! Display formatting for terminal output
//!
//! Bill tables and outbound messages, stock views, and the accounts and
//! customer summaries.

pub mod accounts;
pub mod bill;
pub mod stock;

pub use accounts::{format_customer, format_expense_list, format_sales_summary};
pub use bill::{format_bill, format_bill_table, render_message};
pub use stock::{
    format_item_details, format_price_check, format_size_index, format_stock_by_category,
    format_stock_table,
};
