//! Cell addressing and cell values
//!
//! Every ledger figure lives in a cell of one of four sheets. Running totals
//! are held as [`Accumulator`]s: a base value plus the append-only list of
//! deltas applied since, so the history of every mutation stays visible in
//! the stored document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InvenGoError, InvenGoResult};

/// The sheets of the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sheet {
    /// Item catalog with stock-in and sold ledgers
    #[serde(rename = "Sales & Stocks")]
    Stock,
    /// Append-only log of committed bills
    #[serde(rename = "Bills")]
    Bills,
    /// Customer totals, bill lists and the bill counter
    #[serde(rename = "Customer Data")]
    Customers,
    /// Sale/discount totals and the expense log
    #[serde(rename = "Accounts")]
    Accounts,
}

impl Sheet {
    pub fn all() -> [Sheet; 4] {
        [Sheet::Stock, Sheet::Bills, Sheet::Customers, Sheet::Accounts]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Stock => "Sales & Stocks",
            Sheet::Bills => "Bills",
            Sheet::Customers => "Customer Data",
            Sheet::Accounts => "Accounts",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (sheet, column, row) reference. Rows are 1-based like a spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub sheet: Sheet,
    pub column: char,
    pub row: u32,
}

impl CellAddress {
    pub const fn new(sheet: Sheet, column: char, row: u32) -> Self {
        Self { sheet, column, row }
    }

    /// Spreadsheet-style reference without the sheet, e.g. "J12"
    pub fn a1(&self) -> String {
        format!("{}{}", self.column, self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.sheet, self.column, self.row)
    }
}

/// The content of a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Text(String),
    Number(i64),
    Ledger(Accumulator),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Numeric value of the cell; accumulators are evaluated
    pub fn as_number(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Ledger(acc) => Some(acc.value()),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text shown when the cell is printed as part of a row
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Ledger(acc) => acc.value().to_string(),
        }
    }
}

/// A running total kept as a base value plus every delta applied since
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    base: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    deltas: Vec<i64>,
}

impl Accumulator {
    pub fn new(base: i64) -> Self {
        Self {
            base,
            deltas: Vec::new(),
        }
    }

    pub fn base(&self) -> i64 {
        self.base
    }

    pub fn deltas(&self) -> &[i64] {
        &self.deltas
    }

    /// Current value: the base plus all deltas
    pub fn value(&self) -> i64 {
        self.base + self.deltas.iter().sum::<i64>()
    }

    /// Append a delta and return the new value
    pub fn push(&mut self, delta: i64) -> i64 {
        self.deltas.push(delta);
        self.value()
    }

    /// Rebuild an accumulator from legacy formula text such as `=100+20-5`
    ///
    /// The first term becomes the base and every later term a delta.
    /// `fraction_digits` is the scale of the stored integer: 0 for counts,
    /// 2 for money held in paise.
    pub fn from_legacy(expr: &str, fraction_digits: u32) -> InvenGoResult<Self> {
        let terms = evaluate_legacy_terms(expr, fraction_digits)?;
        let (base, deltas) = terms
            .split_first()
            .ok_or_else(|| InvenGoError::InvalidInput(format!("empty formula: '{}'", expr)))?;
        Ok(Self {
            base: *base,
            deltas: deltas.to_vec(),
        })
    }

    /// Render the accumulator in legacy formula notation, e.g. `=100+20+-5`
    pub fn to_formula(&self) -> String {
        let mut out = format!("={}", self.base);
        for delta in &self.deltas {
            out.push_str(&format!("+{}", delta));
        }
        out
    }
}

/// Split a legacy accumulator formula into its signed, scaled terms
///
/// Only numeric literals joined by `+`/`-` are accepted. The text is never
/// executed; anything outside that grammar is rejected.
pub fn evaluate_legacy_terms(expr: &str, fraction_digits: u32) -> InvenGoResult<Vec<i64>> {
    let invalid = |why: &str| InvenGoError::InvalidInput(format!("formula '{}': {}", expr, why));

    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact.strip_prefix('=').unwrap_or(&compact);
    if body.is_empty() {
        return Err(invalid("no terms"));
    }

    let scale = 10_i64.pow(fraction_digits);
    let chars: Vec<char> = body.chars().collect();
    let mut terms = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let mut negative = false;
        // A leading sign is allowed on the first term; afterwards one operator
        // (optionally followed by a sign, as in `+-5`) separates terms.
        if !terms.is_empty() {
            match chars[pos] {
                '+' => {}
                '-' => negative = true,
                other => return Err(invalid(&format!("unexpected '{}'", other))),
            }
            pos += 1;
        }
        if pos < chars.len() && (chars[pos] == '+' || chars[pos] == '-') {
            if chars[pos] == '-' {
                negative = !negative;
            }
            pos += 1;
        }

        let start = pos;
        while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
            pos += 1;
        }
        let literal: String = chars[start..pos].iter().collect();
        if literal.is_empty() {
            return Err(invalid("operator without a number"));
        }

        let (whole, fraction) = literal.split_once('.').unwrap_or((&literal, ""));
        if whole.is_empty() || fraction.contains('.') {
            return Err(invalid(&format!("bad number '{}'", literal)));
        }
        if fraction.len() > fraction_digits as usize {
            return Err(invalid(&format!("too many decimals in '{}'", literal)));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| invalid(&format!("bad number '{}'", literal)))?;
        let mut scaled_fraction: i64 = 0;
        if !fraction.is_empty() {
            scaled_fraction = fraction
                .parse::<i64>()
                .map_err(|_| invalid(&format!("bad number '{}'", literal)))?
                * 10_i64.pow(fraction_digits - fraction.len() as u32);
        }

        let value = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(scaled_fraction))
            .ok_or_else(|| invalid("number too large"))?;
        terms.push(if negative { -value } else { value });
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = CellAddress::new(Sheet::Stock, 'J', 12);
        assert_eq!(addr.to_string(), "Sales & Stocks!J12");
        assert_eq!(addr.a1(), "J12");
    }

    #[test]
    fn test_accumulator_value() {
        let mut acc = Accumulator::new(100);
        assert_eq!(acc.push(20), 120);
        assert_eq!(acc.push(-5), 115);
        assert_eq!(acc.deltas(), &[20, -5]);
        assert_eq!(acc.base(), 100);
    }

    #[test]
    fn test_legacy_counts() {
        let acc = Accumulator::from_legacy("=100+20+10", 0).unwrap();
        assert_eq!(acc.base(), 100);
        assert_eq!(acc.deltas(), &[20, 10]);
        assert_eq!(acc.value(), 130);
    }

    #[test]
    fn test_legacy_money_and_signs() {
        let acc = Accumulator::from_legacy("= 450.5 + 20 - 0.25", 2).unwrap();
        assert_eq!(acc.value(), 45050 + 2000 - 25);

        let acc = Accumulator::from_legacy("=-5+-3", 0).unwrap();
        assert_eq!(acc.value(), -8);

        let acc = Accumulator::from_legacy("42", 0).unwrap();
        assert_eq!(acc.value(), 42);
    }

    #[test]
    fn test_legacy_rejects_non_arithmetic() {
        assert!(Accumulator::from_legacy("=", 0).is_err());
        assert!(Accumulator::from_legacy("=1*2", 0).is_err());
        assert!(Accumulator::from_legacy("=__import__('os')", 0).is_err());
        assert!(Accumulator::from_legacy("=I2-J2", 0).is_err());
        assert!(Accumulator::from_legacy("=1+", 0).is_err());
        assert!(Accumulator::from_legacy("=1.5", 0).is_err());
        assert!(Accumulator::from_legacy("=1.234", 2).is_err());
    }

    #[test]
    fn test_formula_round_trip_keeps_history() {
        let mut acc = Accumulator::new(7);
        acc.push(1);
        acc.push(-2);
        assert_eq!(acc.to_formula(), "=7+1+-2");
        assert_eq!(Accumulator::from_legacy(&acc.to_formula(), 0).unwrap(), acc);
    }

    #[test]
    fn test_cell_value_numbers() {
        assert_eq!(CellValue::Number(5).as_number(), Some(5));
        assert_eq!(CellValue::Ledger(Accumulator::new(9)).as_number(), Some(9));
        assert_eq!(CellValue::text("x").as_number(), None);
        assert_eq!(CellValue::text("x").as_text(), Some("x"));
    }
}
