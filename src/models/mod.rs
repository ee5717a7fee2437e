//! Core data models for InvenGo
//!
//! Typed records for the catalog, bills, customers and accounts, plus the
//! cell addressing used by the workbook.

pub mod accounts;
pub mod bill;
pub mod cell;
pub mod customer;
pub mod item;
pub mod money;

pub use accounts::{AccountsSummary, Expense};
pub use bill::{
    format_bill_number, BillContent, BillFormat, CommittedBill, DraftBill, LineItem,
    MessageStyle, Packaging, PaymentMode,
};
pub use cell::{Accumulator, CellAddress, CellValue, Sheet};
pub use customer::{normalize_phone, Customer};
pub use item::{Item, NewItem};
pub use money::Money;
