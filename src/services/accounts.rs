//! Accounts ledger
//!
//! The four sale/discount accumulators and the expense log on the
//! `Accounts` sheet.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{AccountsSummary, CellValue, Expense, Money, PaymentMode, Sheet};
use crate::storage::layout::{accounts, accounts_cell};
use crate::storage::{row_number, row_text, CellStore};

const EXPENSE_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct AccountsLedger<'a> {
    cells: &'a dyn CellStore,
    journal: &'a AuditLogger,
}

impl<'a> AccountsLedger<'a> {
    pub fn new(cells: &'a dyn CellStore, journal: &'a AuditLogger) -> Self {
        Self { cells, journal }
    }

    /// Read the four running totals
    pub fn get_summary(&self) -> InvenGoResult<AccountsSummary> {
        let read = |row: u32| -> InvenGoResult<Money> {
            Ok(Money::from_paise(
                self.cells
                    .read_value(&accounts_cell(accounts::VALUE_COLUMN, row))?,
            ))
        };

        Ok(AccountsSummary {
            cash_sale: read(accounts::CASH_SALE_ROW)?,
            digital_sale: read(accounts::DIGITAL_SALE_ROW)?,
            cash_discount: read(accounts::CASH_DISCOUNT_ROW)?,
            digital_discount: read(accounts::DIGITAL_DISCOUNT_ROW)?,
        })
    }

    /// Post a committed bill's subtotal and discount under its payment mode
    pub fn apply_payment(
        &self,
        mode: PaymentMode,
        subtotal: Money,
        discount: Money,
    ) -> InvenGoResult<AccountsSummary> {
        let (sale_row, discount_row) = match mode {
            PaymentMode::Cash => (accounts::CASH_SALE_ROW, accounts::CASH_DISCOUNT_ROW),
            PaymentMode::Digital => (accounts::DIGITAL_SALE_ROW, accounts::DIGITAL_DISCOUNT_ROW),
        };

        let before = self.get_summary()?;
        self.cells.accumulate(
            &accounts_cell(accounts::VALUE_COLUMN, sale_row),
            subtotal.paise(),
        )?;
        if discount.is_positive() {
            self.cells.accumulate(
                &accounts_cell(accounts::VALUE_COLUMN, discount_row),
                discount.paise(),
            )?;
        }
        let after = self.get_summary()?;

        info!(%mode, subtotal = %subtotal, discount = %discount, "payment applied");
        self.journal.log(&AuditEntry::update(
            EntityType::Accounts,
            mode.to_string(),
            None,
            &before,
            &after,
        ))?;
        Ok(after)
    }

    /// Append an expense to the first free row of the expense log
    pub fn add_expense(
        &self,
        amount: Money,
        description: &str,
        date: NaiveDate,
    ) -> InvenGoResult<Expense> {
        let description = description.trim();
        if description.is_empty() {
            return Err(InvenGoError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        if !amount.is_positive() {
            return Err(InvenGoError::Validation(
                "Expense amount must be positive".into(),
            ));
        }

        let row = self.cells.first_free_row(
            Sheet::Accounts,
            accounts::EXPENSE_AMOUNT,
            accounts::EXPENSE_FIRST_ROW,
        )?;
        self.cells.write(
            &accounts_cell(accounts::EXPENSE_AMOUNT, row),
            CellValue::Number(amount.paise()),
        )?;
        self.cells.write(
            &accounts_cell(accounts::EXPENSE_DESCRIPTION, row),
            CellValue::text(description),
        )?;
        self.cells.write(
            &accounts_cell(accounts::EXPENSE_DATE, row),
            CellValue::text(date.format(EXPENSE_DATE_FORMAT).to_string()),
        )?;

        let expense = Expense {
            amount,
            description: description.to_string(),
            date: Some(date),
            row,
        };
        info!(amount = %amount, row, "expense added");
        self.journal.log(&AuditEntry::create(
            EntityType::Expense,
            format!("row {}", row),
            Some(expense.description.clone()),
            &expense,
        ))?;
        Ok(expense)
    }

    /// The expense log, oldest first
    pub fn list_expenses(&self) -> InvenGoResult<Vec<Expense>> {
        let last = self.cells.max_row(Sheet::Accounts)?;
        let mut expenses = Vec::new();

        for row_no in accounts::EXPENSE_FIRST_ROW..=last {
            let Some(row) = self.cells.row(Sheet::Accounts, row_no)? else {
                continue;
            };
            let Some(amount) = row_number(&row, accounts::EXPENSE_AMOUNT) else {
                continue;
            };
            let date = row_text(&row, accounts::EXPENSE_DATE);
            expenses.push(Expense {
                amount: Money::from_paise(amount),
                description: row_text(&row, accounts::EXPENSE_DESCRIPTION),
                date: NaiveDate::parse_from_str(&date, EXPENSE_DATE_FORMAT).ok(),
                row: row_no,
            });
        }

        Ok(expenses)
    }

    pub fn total_expenses(&self) -> InvenGoResult<Money> {
        Ok(self.list_expenses()?.iter().map(|e| e.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inventory::tests::create_test_store;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_fresh_summary_is_zero() {
        let (_temp, store, journal) = create_test_store();
        let ledger = AccountsLedger::new(&store, &journal);
        assert_eq!(ledger.get_summary().unwrap(), AccountsSummary::default());
    }

    #[test]
    fn test_apply_payment_partitions_by_mode() {
        let (_temp, store, journal) = create_test_store();
        let ledger = AccountsLedger::new(&store, &journal);

        ledger
            .apply_payment(PaymentMode::Cash, Money::from_rupees(500), Money::from_rupees(50))
            .unwrap();
        let summary = ledger
            .apply_payment(PaymentMode::Digital, Money::from_rupees(300), Money::zero())
            .unwrap();

        assert_eq!(summary.cash_sale, Money::from_rupees(500));
        assert_eq!(summary.cash_discount, Money::from_rupees(50));
        assert_eq!(summary.digital_sale, Money::from_rupees(300));
        assert_eq!(summary.digital_discount, Money::zero());
    }

    #[test]
    fn test_summary_is_idempotent() {
        let (_temp, store, journal) = create_test_store();
        let ledger = AccountsLedger::new(&store, &journal);
        ledger
            .apply_payment(PaymentMode::Cash, Money::from_rupees(120), Money::zero())
            .unwrap();

        assert_eq!(ledger.get_summary().unwrap(), ledger.get_summary().unwrap());
    }

    #[test]
    fn test_expenses_fill_first_free_row() {
        let (_temp, store, journal) = create_test_store();
        let ledger = AccountsLedger::new(&store, &journal);

        let rent = ledger
            .add_expense(Money::from_rupees(5000), "Rent", today())
            .unwrap();
        let tea = ledger
            .add_expense(Money::parse("35.50").unwrap(), " Tea ", today())
            .unwrap();

        assert_eq!(rent.row, accounts::EXPENSE_FIRST_ROW);
        assert_eq!(tea.row, accounts::EXPENSE_FIRST_ROW + 1);

        let listed = ledger.list_expenses().unwrap();
        assert_eq!(listed, vec![rent, tea]);
        assert_eq!(ledger.total_expenses().unwrap(), Money::from_paise(503550));

        // Expenses share rows with the totals block but never disturb it.
        assert_eq!(ledger.get_summary().unwrap(), AccountsSummary::default());
    }

    #[test]
    fn test_expense_validation() {
        let (_temp, store, journal) = create_test_store();
        let ledger = AccountsLedger::new(&store, &journal);

        assert!(ledger
            .add_expense(Money::from_rupees(10), "  ", today())
            .unwrap_err()
            .is_validation());
        assert!(ledger
            .add_expense(Money::zero(), "Tea", today())
            .unwrap_err()
            .is_validation());
    }
}
