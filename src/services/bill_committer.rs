//! Bill committer
//!
//! Persists a finalized draft across the ledgers in a fixed order:
//!
//! 1. issue the bill number from the customer sheet's counter
//! 2. append the bill block to the `Bills` sheet
//! 3. annotate line rows with their packaging notes
//! 4. credit the customer, if the bill carries a phone
//! 5. post the payment to the accounts totals
//! 6. save the workbook
//!
//! The steps are independent mutations followed by one save. If the save
//! fails, steps 1-5 have already been applied in memory and nothing is
//! rolled back; the ledger journal records which steps ran so the operator
//! can reconcile by hand.

use chrono::{DateTime, Local};
use tracing::info;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{
    format_bill_number, normalize_phone, BillFormat, CellAddress, CellValue, CommittedBill,
    DraftBill, LineItem, Money, PaymentMode, Sheet,
};
use crate::storage::layout::{bills, column_letter};
use crate::storage::CellStore;

use super::accounts::AccountsLedger;
use super::customer::CustomerLedger;

pub struct BillCommitter<'a> {
    cells: &'a dyn CellStore,
    journal: &'a AuditLogger,
    prefix: String,
}

impl<'a> BillCommitter<'a> {
    pub fn new(cells: &'a dyn CellStore, journal: &'a AuditLogger, prefix: &str) -> Self {
        Self {
            cells,
            journal,
            prefix: prefix.to_string(),
        }
    }

    /// Commit a draft stamped with the current time
    pub fn commit(
        &self,
        draft: DraftBill,
        payment_mode: PaymentMode,
        discount: Money,
    ) -> InvenGoResult<CommittedBill> {
        self.commit_at(draft, payment_mode, discount, Local::now())
    }

    pub fn commit_at(
        &self,
        draft: DraftBill,
        payment_mode: PaymentMode,
        discount: Money,
        timestamp: DateTime<Local>,
    ) -> InvenGoResult<CommittedBill> {
        if draft.is_empty() {
            return Err(InvenGoError::Validation("Cannot commit an empty bill".into()));
        }
        let subtotal = draft.line_total();
        if discount.is_negative() {
            return Err(InvenGoError::Validation("Discount cannot be negative".into()));
        }
        if discount > subtotal {
            return Err(InvenGoError::Validation(format!(
                "Discount {} exceeds subtotal {}",
                discount, subtotal
            )));
        }
        let phone = match draft.phone.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(normalize_phone(raw).ok_or_else(|| {
                InvenGoError::InvalidInput(format!("'{}' is not a phone number", raw))
            })?),
            _ => None,
        };

        let customers = CustomerLedger::new(self.cells, self.journal);
        let accounts = AccountsLedger::new(self.cells, self.journal);

        let counter = customers.increment_counter()?;
        let bill = CommittedBill {
            number: format_bill_number(&self.prefix, counter),
            timestamp,
            phone,
            format: draft.format,
            lines: draft.lines,
            packaging: draft.packaging,
            subtotal,
            discount,
            payment_mode,
        };

        let line_rows = self.write_bill_block(&bill)?;
        self.annotate_packaging(&bill, &line_rows)?;
        self.journal.log(&AuditEntry::create(
            EntityType::Bill,
            &bill.number,
            bill.phone.clone(),
            &bill,
        ))?;

        if let Some(phone) = &bill.phone {
            customers.update(phone, bill.net_amount(), &bill.number)?;
        }

        accounts.apply_payment(payment_mode, subtotal, discount)?;

        self.cells.save()?;

        info!(
            number = %bill.number,
            subtotal = %bill.subtotal,
            discount = %bill.discount,
            mode = %bill.payment_mode,
            "bill committed"
        );
        Ok(bill)
    }

    /// Append the bill block; returns the row of each line
    fn write_bill_block(&self, bill: &CommittedBill) -> InvenGoResult<Vec<u32>> {
        let first = |text: String| vec![(bills::FIRST_COLUMN, CellValue::Text(text))];
        let labelled = |label: &str, value: CellValue| {
            vec![
                (bills::LABEL_COLUMN, CellValue::text(label)),
                (bills::VALUE_COLUMN, value),
            ]
        };

        self.cells.append_row(
            Sheet::Bills,
            first(format!("{}{}", bills::NUMBER_PREFIX, bill.number)),
        )?;
        self.cells.append_row(
            Sheet::Bills,
            first(format!(
                "{}{}",
                bills::DATE_PREFIX,
                bill.timestamp.format(bills::DATE_FORMAT)
            )),
        )?;
        if let Some(phone) = &bill.phone {
            self.cells
                .append_row(Sheet::Bills, first(format!("{}{}", bills::PHONE_PREFIX, phone)))?;
        }

        let headers = bill
            .format
            .headers()
            .iter()
            .enumerate()
            .map(|(i, title)| (column_letter(i), CellValue::text(*title)))
            .collect();
        self.cells.append_row(Sheet::Bills, headers)?;

        let mut line_rows = Vec::with_capacity(bill.lines.len());
        for line in &bill.lines {
            let row = self
                .cells
                .append_row(Sheet::Bills, line_cells(line, bill.format))?;
            line_rows.push(row);
        }

        self.cells.append_row(Sheet::Bills, Vec::new())?;
        self.cells.append_row(
            Sheet::Bills,
            labelled(bills::SUBTOTAL_LABEL, CellValue::Number(bill.subtotal.paise())),
        )?;
        if bill.discount.is_positive() {
            self.cells.append_row(
                Sheet::Bills,
                labelled(bills::DISCOUNT_LABEL, CellValue::Number(bill.discount.paise())),
            )?;
            self.cells.append_row(
                Sheet::Bills,
                labelled(bills::TOTAL_LABEL, CellValue::Number(bill.net_amount().paise())),
            )?;
        }
        self.cells.append_row(
            Sheet::Bills,
            labelled(bills::PAYMENT_LABEL, CellValue::text(bill.payment_mode.to_string())),
        )?;

        Ok(line_rows)
    }

    fn annotate_packaging(&self, bill: &CommittedBill, line_rows: &[u32]) -> InvenGoResult<()> {
        for (line, row) in bill.lines.iter().zip(line_rows) {
            if let Some(notes) = bill.packaging.get(&line.name) {
                self.cells.annotate(
                    &CellAddress::new(Sheet::Bills, bills::NOTE_COLUMN, *row),
                    &notes.join("\n"),
                )?;
            }
        }
        Ok(())
    }
}

/// Cells of one line row, in the column order of `format`
fn line_cells(line: &LineItem, format: BillFormat) -> Vec<(char, CellValue)> {
    let mut values = vec![CellValue::Number(i64::from(line.sequence_no))];
    if format.shows_code() {
        values.push(CellValue::text(line.code.clone().unwrap_or_default()));
    }
    values.push(CellValue::text(&line.name));
    values.push(CellValue::text(&line.size));
    if format == BillFormat::Full {
        values.push(CellValue::Number(line.mrp.unwrap_or_default().paise()));
    }
    if format.shows_rate() {
        values.push(CellValue::Number(line.unit_price.paise()));
    }
    values.push(CellValue::Number(i64::from(line.quantity)));
    values.push(CellValue::Number(line.amount.paise()));

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| (column_letter(i), value))
        .collect()
}
