//! Customer ledger
//!
//! Per-phone running totals and bill lists on the `Customer Data` sheet,
//! plus the bill counter that lives in the same sheet.

use tracing::{debug, info};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{normalize_phone, Accumulator, CellValue, Customer, Money, Sheet};
use crate::storage::layout::{bill_counter_cell, customer_cell, customers};
use crate::storage::{row_number, row_text, CellStore};

pub struct CustomerLedger<'a> {
    cells: &'a dyn CellStore,
    journal: &'a AuditLogger,
}

impl<'a> CustomerLedger<'a> {
    pub fn new(cells: &'a dyn CellStore, journal: &'a AuditLogger) -> Self {
        Self { cells, journal }
    }

    /// Find a customer by phone number
    pub fn get_customer(&self, phone: &str) -> InvenGoResult<Customer> {
        self.find(phone)?
            .ok_or_else(|| InvenGoError::customer_not_found(phone.trim()))
    }

    pub fn find(&self, phone: &str) -> InvenGoResult<Option<Customer>> {
        let Some(wanted) = normalize_phone(phone) else {
            return Err(InvenGoError::InvalidInput(format!(
                "'{}' is not a phone number",
                phone.trim()
            )));
        };
        Ok(self
            .list()?
            .into_iter()
            .find(|customer| normalize_phone(&customer.phone).as_deref() == Some(wanted.as_str())))
    }

    /// All customers in sheet order
    pub fn list(&self) -> InvenGoResult<Vec<Customer>> {
        let last = self.cells.max_row(Sheet::Customers)?;
        let mut found = Vec::new();

        for row_no in customers::FIRST_ROW..=last {
            let Some(row) = self.cells.row(Sheet::Customers, row_no)? else {
                continue;
            };
            let phone = row_text(&row, customers::PHONE);
            if phone.is_empty() {
                continue;
            }
            found.push(Customer {
                phone,
                total: Money::from_paise(row_number(&row, customers::TOTAL).unwrap_or(0)),
                bills: row_text(&row, customers::BILLS)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
                row: row_no,
            });
        }

        Ok(found)
    }

    /// Credit a bill to a customer, creating the customer on first purchase
    pub fn update(
        &self,
        phone: &str,
        net_amount: Money,
        bill_number: &str,
    ) -> InvenGoResult<Customer> {
        match self.find(phone)? {
            Some(before) => {
                let total =
                    self.cells
                        .accumulate(&customer_cell(customers::TOTAL, before.row), net_amount.paise())?;

                let mut after = before.clone();
                after.total = Money::from_paise(total);
                after.bills.push(bill_number.to_string());
                self.cells.write(
                    &customer_cell(customers::BILLS, before.row),
                    CellValue::text(after.bills.join(" ")),
                )?;

                debug!(phone = %after.phone, bills = after.bill_count(), "customer updated");
                self.journal.log(&AuditEntry::update(
                    EntityType::Customer,
                    &after.phone,
                    None,
                    &before,
                    &after,
                ))?;
                Ok(after)
            }
            None => {
                let phone = normalize_phone(phone).unwrap_or_else(|| phone.trim().to_string());
                let row = self.cells.append_row(
                    Sheet::Customers,
                    vec![
                        (customers::PHONE, CellValue::text(&phone)),
                        (
                            customers::TOTAL,
                            CellValue::Ledger(Accumulator::new(net_amount.paise())),
                        ),
                        (customers::BILLS, CellValue::text(bill_number)),
                    ],
                )?;

                let customer = Customer {
                    phone,
                    total: net_amount,
                    bills: vec![bill_number.to_string()],
                    row,
                };
                info!(phone = %customer.phone, row, "new customer");
                self.journal.log(&AuditEntry::create(
                    EntityType::Customer,
                    &customer.phone,
                    None,
                    &customer,
                ))?;
                Ok(customer)
            }
        }
    }

    /// Current value of the bill counter
    pub fn current_counter(&self) -> InvenGoResult<u64> {
        let value = self.cells.read_value(&bill_counter_cell())?;
        u64::try_from(value)
            .map_err(|_| InvenGoError::Storage(format!("Bill counter is negative: {}", value)))
    }

    /// Advance the bill counter by one and return the new value
    pub fn increment_counter(&self) -> InvenGoResult<u64> {
        let before = self.current_counter()?;
        let value = self.cells.accumulate(&bill_counter_cell(), 1)?;
        let after = u64::try_from(value)
            .map_err(|_| InvenGoError::Storage(format!("Bill counter is negative: {}", value)))?;

        self.journal.log(&AuditEntry::update(
            EntityType::Counter,
            bill_counter_cell().to_string(),
            None,
            &before,
            &after,
        ))?;
        Ok(after)
    }
}
