//! Accounts display formatting
//!
//! The sales summary, the expense log and customer accounts.

use crate::models::{AccountsSummary, Customer, Expense, Money};

/// Format the sale and discount totals
pub fn format_sales_summary(summary: &AccountsSummary, symbol: &str) -> String {
    let line = |label: &str, amount: Money| {
        format!("{:<18}{:>14}\n", label, amount.format_with_symbol(symbol))
    };

    let mut output = String::new();
    output.push_str("Sales Summary\n");
    output.push_str(&"=".repeat(32));
    output.push('\n');
    output.push_str(&line("Cash sales", summary.cash_sale));
    output.push_str(&line("Digital sales", summary.digital_sale));
    output.push_str(&line("Total sales", summary.total_sales()));
    output.push_str(&"-".repeat(32));
    output.push('\n');
    output.push_str(&line("Cash discounts", summary.cash_discount));
    output.push_str(&line("Digital discounts", summary.digital_discount));
    output.push_str(&line("Total discounts", summary.total_discounts()));
    output.push_str(&"-".repeat(32));
    output.push('\n');
    output.push_str(&line("Net sales", summary.net_sales()));
    output
}

/// Format the expense log with a total
pub fn format_expense_list(expenses: &[Expense], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<10}  {:<30}  {:>12}\n", "Date", "Description", "Amount"));
    output.push_str(&"-".repeat(56));
    output.push('\n');

    for expense in expenses {
        let date = expense
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<10}  {:<30}  {:>12}\n",
            date,
            expense.description,
            expense.amount.format_with_symbol(symbol)
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(56));
    output.push('\n');
    output.push_str(&format!(
        "{:<10}  {:<30}  {:>12}\n",
        "TOTAL",
        "",
        total.format_with_symbol(symbol)
    ));
    output
}

/// Format one customer's account
pub fn format_customer(customer: &Customer, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Customer: {}\n", customer.phone));
    output.push_str(&format!(
        "  Total spent: {}\n",
        customer.total.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Bills ({}):", customer.bill_count()));
    if customer.bills.is_empty() {
        output.push_str(" none");
    } else {
        output.push(' ');
        output.push_str(&customer.bills.join(", "));
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_sales_summary() {
        let summary = AccountsSummary {
            cash_sale: Money::from_rupees(500),
            digital_sale: Money::from_rupees(300),
            cash_discount: Money::from_rupees(50),
            digital_discount: Money::zero(),
        };
        let output = format_sales_summary(&summary, "₹");

        assert!(output.contains("Cash sales"));
        assert!(output.contains("₹800.00"));
        assert!(output.contains("₹50.00"));
        assert!(output.contains("₹750.00"));
    }

    #[test]
    fn test_expense_list() {
        let expenses = vec![
            Expense {
                amount: Money::from_rupees(5000),
                description: "Rent".into(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1),
                row: 4,
            },
            Expense {
                amount: Money::parse("35.50").unwrap(),
                description: "Tea".into(),
                date: None,
                row: 5,
            },
        ];
        let output = format_expense_list(&expenses, "₹");

        assert!(output.contains("2024-03-01"));
        assert!(output.contains("Tea"));
        assert!(output.contains("₹5035.50"));
        assert_eq!(format_expense_list(&[], "₹"), "No expenses recorded.\n");
    }

    #[test]
    fn test_customer() {
        let customer = Customer {
            phone: "9876543210".into(),
            total: Money::from_rupees(430),
            bills: vec!["INV0001".into(), "INV0003".into()],
            row: 3,
        };
        let output = format_customer(&customer, "₹");
        assert!(output.contains("Total spent: ₹430.00"));
        assert!(output.contains("Bills (2): INV0001, INV0003"));
    }
}
