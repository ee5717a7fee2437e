//! Accounts CLI commands
//!
//! The sales summary, the expense log and the customer list.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_customer, format_expense_list, format_sales_summary};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::Money;
use crate::services::{AccountsLedger, CustomerLedger};
use crate::storage::Storage;

/// Accounts subcommands
#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Show cash and digital sales and discounts
    Summary,
    /// Record an expense
    Expense {
        /// Amount (e.g. "250" or "35.50")
        amount: String,
        /// What the money was spent on
        description: String,
        /// Date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List recorded expenses
    Expenses,
    /// List customers with their totals and bills
    Customers,
}

/// Handle an accounts command
pub fn handle_accounts_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountsCommands,
) -> InvenGoResult<()> {
    let ledger = AccountsLedger::new(&storage.cells, &storage.journal);
    let symbol = &settings.currency_symbol;

    match cmd {
        AccountsCommands::Summary => {
            print!("{}", format_sales_summary(&ledger.get_summary()?, symbol));
        }

        AccountsCommands::Expense {
            amount,
            description,
            date,
        } => {
            let amount = Money::parse(&amount).map_err(|e| {
                InvenGoError::Validation(format!("Invalid amount '{}': {}", amount, e))
            })?;
            let date = match date {
                Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
                    InvenGoError::Validation(format!(
                        "Invalid date '{}'. Use YYYY-MM-DD",
                        date
                    ))
                })?,
                None => Local::now().date_naive(),
            };

            let expense = ledger.add_expense(amount, &description, date)?;
            storage.save()?;
            println!(
                "Recorded expense: {} {}",
                expense.description,
                expense.amount.format_with_symbol(symbol)
            );
        }

        AccountsCommands::Expenses => {
            print!("{}", format_expense_list(&ledger.list_expenses()?, symbol));
        }

        AccountsCommands::Customers => {
            let customers = CustomerLedger::new(&storage.cells, &storage.journal).list()?;
            if customers.is_empty() {
                println!("No customers yet.");
            }
            for customer in customers {
                print!("{}", format_customer(&customer, symbol));
            }
        }
    }

    Ok(())
}
