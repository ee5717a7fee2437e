//! Bill models
//!
//! A [`DraftBill`] is owned by one run of the bill builder. Once committed it
//! becomes a [`CommittedBill`] with an issued bill number; committed bills
//! are append-only and never mutated.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Width of the zero-padded counter in a bill number
pub const BILL_NUMBER_WIDTH: usize = 4;

/// Format a bill number from the shop prefix and counter value
///
/// ```
/// use invengo::models::format_bill_number;
/// assert_eq!(format_bill_number("INV", 8), "INV0008");
/// ```
pub fn format_bill_number(prefix: &str, counter: u64) -> String {
    format!("{}{:0width$}", prefix, counter, width = BILL_NUMBER_WIDTH)
}

/// Column layout used for bill rows on the console and in the bills sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillFormat {
    /// S.No., Item, Size, Qty, Amount
    #[default]
    Compact,
    /// Adds the rate column
    Detailed,
    /// Adds code, MRP and rate columns
    Full,
}

impl BillFormat {
    pub fn all() -> [BillFormat; 3] {
        [BillFormat::Compact, BillFormat::Detailed, BillFormat::Full]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "1" => Some(Self::Compact),
            "detailed" | "2" => Some(Self::Detailed),
            "full" | "3" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Self::Compact => &["S.No.", "Item", "Size", "Qty", "Amount"],
            Self::Detailed => &["S.No.", "Item", "Size", "Rate", "Qty", "Amount"],
            Self::Full => &["S.No.", "Code", "Item", "Size", "MRP", "Rate", "Qty", "Amount"],
        }
    }

    pub fn shows_rate(&self) -> bool {
        !matches!(self, Self::Compact)
    }

    pub fn shows_code(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Recognize a stored header row
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        Self::all().into_iter().find(|format| {
            format.headers().len() == headers.len()
                && format
                    .headers()
                    .iter()
                    .zip(headers)
                    .all(|(a, b)| *a == b.as_ref())
        })
    }

    /// The synthetic total row: "TOTAL" under Size (compact), Rate (detailed)
    /// or Qty (full), with the subtotal under Amount
    pub fn total_row(&self, subtotal: Money) -> Vec<String> {
        let width = self.headers().len();
        let label_column = match self {
            Self::Compact => 2,
            Self::Detailed => 3,
            Self::Full => width - 2,
        };
        let mut row = vec![String::new(); width];
        row[label_column] = "TOTAL".to_string();
        row[width - 1] = subtotal.to_string();
        row
    }
}

impl fmt::Display for BillFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "Compact"),
            Self::Detailed => write!(f, "Detailed"),
            Self::Full => write!(f, "Full"),
        }
    }
}

/// Verbosity of the outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    #[default]
    Simple,
    Detailed,
    Professional,
}

impl MessageStyle {
    pub fn all() -> [MessageStyle; 3] {
        [Self::Simple, Self::Detailed, Self::Professional]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "1" => Some(Self::Simple),
            "detailed" | "2" => Some(Self::Detailed),
            "professional" | "3" => Some(Self::Professional),
            _ => None,
        }
    }
}

impl fmt::Display for MessageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "Simple"),
            Self::Detailed => write!(f, "Detailed"),
            Self::Professional => write!(f, "Professional"),
        }
    }
}

/// How a bill was paid; partitions the accounts totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Cash,
    Digital,
}

impl PaymentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "1" => Some(Self::Cash),
            "digital" | "upi" | "card" | "2" => Some(Self::Digital),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Digital => write!(f, "Digital"),
        }
    }
}

/// One line of a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sequence_no: u32,

    /// Absent on lines read back from a compact or detailed bill
    pub code: Option<String>,

    pub name: String,

    /// Size label, e.g. "500GM"
    pub size: String,

    /// Absent on lines read back from a compact or detailed bill
    pub mrp: Option<Money>,

    pub unit_price: Money,
    pub quantity: u32,
    pub amount: Money,
}

impl LineItem {
    /// Cells of this line in the given format's column order
    pub fn row(&self, format: BillFormat) -> Vec<String> {
        let code = self.code.clone().unwrap_or_default();
        let mrp = self.mrp.map(|m| m.to_string()).unwrap_or_default();
        match format {
            BillFormat::Compact => vec![
                self.sequence_no.to_string(),
                self.name.clone(),
                self.size.clone(),
                self.quantity.to_string(),
                self.amount.to_string(),
            ],
            BillFormat::Detailed => vec![
                self.sequence_no.to_string(),
                self.name.clone(),
                self.size.clone(),
                self.unit_price.to_string(),
                self.quantity.to_string(),
                self.amount.to_string(),
            ],
            BillFormat::Full => vec![
                self.sequence_no.to_string(),
                code,
                self.name.clone(),
                self.size.clone(),
                mrp,
                self.unit_price.to_string(),
                self.quantity.to_string(),
                self.amount.to_string(),
            ],
        }
    }
}

/// Packaging notes keyed by item name, each "<size>GM x <qty>"
pub type Packaging = BTreeMap<String, Vec<String>>;

/// An in-progress bill produced by the bill builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBill {
    pub format: BillFormat,
    pub lines: Vec<LineItem>,
    pub packaging: Packaging,

    /// Total grams per item name
    pub weights: BTreeMap<String, u64>,

    pub phone: Option<String>,
    pub subtotal: Money,

    /// Synthetic total row in the active format, set when finalized
    pub total_row: Vec<String>,
}

impl DraftBill {
    pub fn new(format: BillFormat, phone: Option<String>) -> Self {
        Self {
            format,
            lines: Vec::new(),
            packaging: Packaging::new(),
            weights: BTreeMap::new(),
            phone,
            subtotal: Money::zero(),
            total_row: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_total(&self) -> Money {
        self.lines.iter().map(|line| line.amount).sum()
    }
}

/// A finalized, persisted bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedBill {
    pub number: String,
    pub timestamp: DateTime<Local>,
    pub phone: Option<String>,
    pub format: BillFormat,
    pub lines: Vec<LineItem>,
    pub packaging: Packaging,
    pub subtotal: Money,
    pub discount: Money,
    pub payment_mode: PaymentMode,
}

impl CommittedBill {
    /// Subtotal less discount; the amount credited to the customer
    pub fn net_amount(&self) -> Money {
        self.subtotal - self.discount
    }
}

/// Read access shared by draft and committed bills for rendering
pub trait BillContent {
    fn format(&self) -> BillFormat;
    fn lines(&self) -> &[LineItem];
    fn packaging(&self) -> &Packaging;
    fn subtotal(&self) -> Money;
    fn discount(&self) -> Money;
    fn number(&self) -> Option<&str>;
    fn phone(&self) -> Option<&str>;
    fn timestamp(&self) -> Option<DateTime<Local>>;

    fn net_amount(&self) -> Money {
        self.subtotal() - self.discount()
    }
}

impl BillContent for DraftBill {
    fn format(&self) -> BillFormat {
        self.format
    }

    fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    fn packaging(&self) -> &Packaging {
        &self.packaging
    }

    fn subtotal(&self) -> Money {
        self.subtotal
    }

    fn discount(&self) -> Money {
        Money::zero()
    }

    fn number(&self) -> Option<&str> {
        None
    }

    fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    fn timestamp(&self) -> Option<DateTime<Local>> {
        None
    }
}

impl BillContent for CommittedBill {
    fn format(&self) -> BillFormat {
        self.format
    }

    fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    fn packaging(&self) -> &Packaging {
        &self.packaging
    }

    fn subtotal(&self) -> Money {
        self.subtotal
    }

    fn discount(&self) -> Money {
        self.discount
    }

    fn number(&self) -> Option<&str> {
        Some(&self.number)
    }

    fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    fn timestamp(&self) -> Option<DateTime<Local>> {
        Some(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> LineItem {
        LineItem {
            sequence_no: 1,
            code: Some("ALM050".into()),
            name: "Almonds".into(),
            size: "50GM".into(),
            mrp: Some(Money::from_rupees(60)),
            unit_price: Money::from_rupees(55),
            quantity: 2,
            amount: Money::from_rupees(110),
        }
    }

    #[test]
    fn test_bill_number_format() {
        assert_eq!(format_bill_number("INV", 8), "INV0008");
        assert_eq!(format_bill_number("INV", 1234), "INV1234");
        assert_eq!(format_bill_number("INV", 12345), "INV12345");
    }

    #[test]
    fn test_headers_match_rows() {
        for format in BillFormat::all() {
            assert_eq!(format.headers().len(), line().row(format).len());
            assert_eq!(format.headers().len(), format.total_row(Money::zero()).len());
            assert_eq!(BillFormat::from_headers(format.headers()), Some(format));
        }
    }

    #[test]
    fn test_total_row() {
        let row = BillFormat::Compact.total_row(Money::from_rupees(500));
        assert_eq!(row, vec!["", "", "TOTAL", "", "500.00"]);

        let row = BillFormat::Detailed.total_row(Money::from_rupees(500));
        assert_eq!(row, vec!["", "", "", "TOTAL", "", "500.00"]);

        let row = BillFormat::Full.total_row(Money::from_rupees(500));
        assert_eq!(row[6], "TOTAL");
        assert_eq!(row[7], "500.00");
    }

    #[test]
    fn test_full_row_includes_code_and_mrp() {
        let row = line().row(BillFormat::Full);
        assert_eq!(row[1], "ALM050");
        assert_eq!(row[4], "60.00");
        assert_eq!(row[5], "55.00");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(BillFormat::parse("Detailed"), Some(BillFormat::Detailed));
        assert_eq!(MessageStyle::parse("3"), Some(MessageStyle::Professional));
        assert_eq!(PaymentMode::parse("2"), Some(PaymentMode::Digital));
        assert_eq!(PaymentMode::parse("cheque"), None);
    }

    #[test]
    fn test_net_amount() {
        let bill = CommittedBill {
            number: "INV0001".into(),
            timestamp: Local::now(),
            phone: None,
            format: BillFormat::Compact,
            lines: vec![line()],
            packaging: Packaging::new(),
            subtotal: Money::from_rupees(110),
            discount: Money::from_rupees(10),
            payment_mode: PaymentMode::Cash,
        };
        assert_eq!(bill.net_amount(), Money::from_rupees(100));
        assert_eq!(BillContent::net_amount(&bill), Money::from_rupees(100));
    }
}
