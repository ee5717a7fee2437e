//! Read-only view of committed bills
//!
//! Bills are reconstructed by scanning the blocks of the `Bills` sheet.
//! Nothing here writes to the store.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{
    normalize_phone, BillFormat, CellAddress, CommittedBill, LineItem, Money, Packaging,
    PaymentMode, Sheet,
};
use crate::storage::layout::{bills, column_letter};
use crate::storage::{row_number, row_text, CellStore, Row};

pub struct BillArchive<'a> {
    cells: &'a dyn CellStore,
}

impl<'a> BillArchive<'a> {
    pub fn new(cells: &'a dyn CellStore) -> Self {
        Self { cells }
    }

    /// Every committed bill, oldest first
    pub fn all(&self) -> InvenGoResult<Vec<CommittedBill>> {
        let last = self.cells.max_row(Sheet::Bills)?;
        let mut found = Vec::new();
        let mut current: Option<BlockReader> = None;

        for row_no in 1..=last {
            let row = self.cells.row(Sheet::Bills, row_no)?.unwrap_or_default();
            let first = row_text(&row, bills::FIRST_COLUMN);

            if let Some(number) = first.strip_prefix(bills::NUMBER_PREFIX) {
                if let Some(block) = current.take() {
                    found.push(block.finish()?);
                }
                current = Some(BlockReader::new(number.trim()));
                continue;
            }

            if let Some(block) = current.as_mut() {
                let note = self
                    .cells
                    .note(&CellAddress::new(Sheet::Bills, bills::NOTE_COLUMN, row_no))?;
                block.feed(row_no, &row, &first, note)?;
            }
        }

        if let Some(block) = current {
            found.push(block.finish()?);
        }
        Ok(found)
    }

    /// Find a bill by number (case-insensitive)
    pub fn find(&self, number: &str) -> InvenGoResult<CommittedBill> {
        let wanted = number.trim().to_uppercase();
        self.all()?
            .into_iter()
            .find(|bill| bill.number.to_uppercase() == wanted)
            .ok_or_else(|| InvenGoError::bill_not_found(number.trim()))
    }

    /// Bills issued to a phone number, oldest first
    pub fn for_phone(&self, phone: &str) -> InvenGoResult<Vec<CommittedBill>> {
        let wanted = normalize_phone(phone).ok_or_else(|| {
            InvenGoError::InvalidInput(format!("'{}' is not a phone number", phone.trim()))
        })?;
        Ok(self
            .all()?
            .into_iter()
            .filter(|bill| bill.phone.as_deref().and_then(normalize_phone) == Some(wanted.clone()))
            .collect())
    }

    pub fn latest(&self) -> InvenGoResult<Option<CommittedBill>> {
        Ok(self.all()?.pop())
    }
}

/// Accumulates the rows of one bill block
struct BlockReader {
    number: String,
    timestamp: Option<DateTime<Local>>,
    phone: Option<String>,
    format: Option<BillFormat>,
    in_lines: bool,
    lines: Vec<LineItem>,
    packaging: Packaging,
    subtotal: Option<Money>,
    discount: Money,
    payment_mode: Option<PaymentMode>,
}

impl BlockReader {
    fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            timestamp: None,
            phone: None,
            format: None,
            in_lines: false,
            lines: Vec::new(),
            packaging: Packaging::new(),
            subtotal: None,
            discount: Money::zero(),
            payment_mode: None,
        }
    }

    fn malformed(&self, row_no: u32, what: &str) -> InvenGoError {
        InvenGoError::Storage(format!(
            "Bill {} ({} row {}): {}",
            self.number,
            Sheet::Bills,
            row_no,
            what
        ))
    }

    fn feed(
        &mut self,
        row_no: u32,
        row: &Row,
        first: &str,
        note: Option<String>,
    ) -> InvenGoResult<()> {
        if let Some(date) = first.strip_prefix(bills::DATE_PREFIX) {
            let naive = NaiveDateTime::parse_from_str(date.trim(), bills::DATE_FORMAT)
                .map_err(|_| self.malformed(row_no, "unreadable date"))?;
            self.timestamp = Local.from_local_datetime(&naive).earliest();
            return Ok(());
        }
        if let Some(phone) = first.strip_prefix(bills::PHONE_PREFIX) {
            self.phone = Some(phone.trim().to_string());
            return Ok(());
        }

        if self.format.is_none() {
            let headers: Vec<String> = (0..)
                .map(|i| row_text(row, column_letter(i)))
                .take_while(|text| !text.is_empty())
                .collect();
            if let Some(format) = BillFormat::from_headers(&headers) {
                self.format = Some(format);
                self.in_lines = true;
            }
            return Ok(());
        }

        if self.in_lines {
            if row.is_empty() {
                self.in_lines = false;
            } else {
                self.read_line(row_no, row, note)?;
            }
            return Ok(());
        }

        let value = || row_number(row, bills::VALUE_COLUMN).map(Money::from_paise);
        match row_text(row, bills::LABEL_COLUMN).as_str() {
            bills::SUBTOTAL_LABEL => self.subtotal = value(),
            bills::DISCOUNT_LABEL => self.discount = value().unwrap_or_default(),
            bills::PAYMENT_LABEL => {
                self.payment_mode = PaymentMode::parse(&row_text(row, bills::VALUE_COLUMN))
            }
            _ => {}
        }
        Ok(())
    }

    fn read_line(&mut self, row_no: u32, row: &Row, note: Option<String>) -> InvenGoResult<()> {
        let Some(format) = self.format else {
            return Ok(());
        };

        let mut line = LineItem {
            sequence_no: 0,
            code: None,
            name: String::new(),
            size: String::new(),
            mrp: None,
            unit_price: Money::zero(),
            quantity: 0,
            amount: Money::zero(),
        };
        let mut rate = None;

        for (i, header) in format.headers().iter().enumerate() {
            let column = column_letter(i);
            let number = row_number(row, column);
            match *header {
                "S.No." => line.sequence_no = number.and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
                "Code" => line.code = Some(row_text(row, column)),
                "Item" => line.name = row_text(row, column),
                "Size" => line.size = row_text(row, column),
                "MRP" => line.mrp = number.map(Money::from_paise),
                "Rate" => rate = number.map(Money::from_paise),
                "Qty" => {
                    line.quantity = number
                        .and_then(|n| u32::try_from(n).ok())
                        .ok_or_else(|| self.malformed(row_no, "bad quantity"))?
                }
                "Amount" => {
                    line.amount = number
                        .map(Money::from_paise)
                        .ok_or_else(|| self.malformed(row_no, "bad amount"))?
                }
                _ => {}
            }
        }

        line.unit_price = match rate {
            Some(rate) => rate,
            None if line.quantity > 0 => {
                Money::from_paise(line.amount.paise() / i64::from(line.quantity))
            }
            None => Money::zero(),
        };

        if let Some(note) = note {
            self.packaging
                .entry(line.name.clone())
                .or_insert_with(|| note.lines().map(str::to_string).collect());
        }
        self.lines.push(line);
        Ok(())
    }

    fn finish(self) -> InvenGoResult<CommittedBill> {
        let missing = |what: &str| {
            InvenGoError::Storage(format!("Bill {} is missing its {}", self.number, what))
        };
        let timestamp = self.timestamp.ok_or_else(|| missing("date"))?;
        let format = self.format.ok_or_else(|| missing("column headers"))?;
        let payment_mode = self.payment_mode.ok_or_else(|| missing("payment mode"))?;
        let subtotal = self
            .subtotal
            .unwrap_or_else(|| self.lines.iter().map(|l| l.amount).sum());

        Ok(CommittedBill {
            number: self.number,
            timestamp,
            phone: self.phone,
            format,
            lines: self.lines,
            packaging: self.packaging,
            subtotal,
            discount: self.discount,
            payment_mode,
        })
    }
}
