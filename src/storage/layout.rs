//! Sheet layout of the workbook
//!
//! Column letters and fixed rows for every sheet. Only this module and the
//! ledgers that own a sheet should know where a figure is stored.

use crate::models::{CellAddress, Sheet};

/// `Sales & Stocks`: one item per row
pub mod stock {
    pub const HEADER_ROW: u32 = 1;
    pub const FIRST_ROW: u32 = 2;

    pub const BASE_CODE: char = 'A';
    pub const CATEGORY: char = 'B';
    pub const CODE: char = 'C';
    pub const NAME: char = 'D';
    pub const SIZE: char = 'E';
    pub const UNIT: char = 'F';
    pub const MRP: char = 'G';
    pub const PRICE: char = 'H';
    /// Accumulator: units received
    pub const STOCK_IN: char = 'I';
    /// Accumulator: units sold
    pub const SOLD: char = 'J';

    pub const HEADERS: [(char, &str); 10] = [
        (BASE_CODE, "Base Code"),
        (CATEGORY, "Category"),
        (CODE, "Code"),
        (NAME, "Name"),
        (SIZE, "Size"),
        (UNIT, "Unit"),
        (MRP, "MRP"),
        (PRICE, "Price"),
        (STOCK_IN, "Stock"),
        (SOLD, "Sale"),
    ];
}

/// `Customer Data`: bill counter plus one customer per row
pub mod customers {
    pub const HEADER_ROW: u32 = 2;
    pub const FIRST_ROW: u32 = 3;

    pub const PHONE: char = 'A';
    /// Accumulator: net spend in paise
    pub const TOTAL: char = 'B';
    /// Space-separated bill numbers
    pub const BILLS: char = 'C';

    pub const COUNTER_LABEL_COLUMN: char = 'H';
    pub const COUNTER_COLUMN: char = 'I';
    pub const COUNTER_ROW: u32 = 1;

    pub const HEADERS: [(char, &str); 3] = [(PHONE, "Phone"), (TOTAL, "Total"), (BILLS, "Bills")];
}

/// `Accounts`: sale/discount accumulators and the expense log
pub mod accounts {
    pub const LABEL_COLUMN: char = 'A';
    pub const VALUE_COLUMN: char = 'B';

    pub const CASH_SALE_ROW: u32 = 2;
    pub const DIGITAL_SALE_ROW: u32 = 3;
    pub const CASH_DISCOUNT_ROW: u32 = 4;
    pub const DIGITAL_DISCOUNT_ROW: u32 = 5;

    pub const EXPENSE_HEADER_ROW: u32 = 3;
    pub const EXPENSE_FIRST_ROW: u32 = 4;
    pub const EXPENSE_AMOUNT: char = 'G';
    pub const EXPENSE_DESCRIPTION: char = 'H';
    pub const EXPENSE_DATE: char = 'I';

    pub const TOTAL_LABELS: [(u32, &str); 4] = [
        (CASH_SALE_ROW, "Cash Sale"),
        (DIGITAL_SALE_ROW, "Digital Sale"),
        (CASH_DISCOUNT_ROW, "Cash Discount"),
        (DIGITAL_DISCOUNT_ROW, "Digital Discount"),
    ];
}

/// `Bills`: append-only blocks, one per committed bill
pub mod bills {
    /// First column of every bill row
    pub const FIRST_COLUMN: char = 'A';
    /// Column of the totals labels ("Subtotal:", "Payment Mode:")
    pub const LABEL_COLUMN: char = 'C';
    /// Column of the totals values
    pub const VALUE_COLUMN: char = 'D';
    /// Packaging notes are attached to this column of a line row
    pub const NOTE_COLUMN: char = 'D';

    pub const NUMBER_PREFIX: &str = "Bill No: ";
    pub const DATE_PREFIX: &str = "Date: ";
    pub const PHONE_PREFIX: &str = "Phone: ";
    pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

    pub const SUBTOTAL_LABEL: &str = "Subtotal:";
    pub const DISCOUNT_LABEL: &str = "Discount:";
    pub const TOTAL_LABEL: &str = "Total:";
    pub const PAYMENT_LABEL: &str = "Payment Mode:";
}

/// Column letter for a zero-based column index within a row
pub fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

pub fn stock_cell(column: char, row: u32) -> CellAddress {
    CellAddress::new(Sheet::Stock, column, row)
}

pub fn customer_cell(column: char, row: u32) -> CellAddress {
    CellAddress::new(Sheet::Customers, column, row)
}

pub fn accounts_cell(column: char, row: u32) -> CellAddress {
    CellAddress::new(Sheet::Accounts, column, row)
}

pub fn bill_counter_cell() -> CellAddress {
    customer_cell(customers::COUNTER_COLUMN, customers::COUNTER_ROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(7), 'H');
    }

    #[test]
    fn test_counter_cell() {
        assert_eq!(bill_counter_cell().to_string(), "Customer Data!I1");
    }
}
