//! Money type for representing currency amounts
//!
//! Internally stores amounts in paise (i64) so that ledger arithmetic is
//! exact. The currency symbol is a display concern supplied by settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A monetary amount stored in paise (hundredths of a rupee)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from paise
    ///
    /// # Examples
    /// ```
    /// use invengo::models::Money;
    /// let amount = Money::from_paise(45050); // 450.50
    /// assert_eq!(amount.rupees(), 450);
    /// ```
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// Create a Money amount from whole rupees
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Whole rupees (truncated toward zero)
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// The paise portion (0-99)
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "450", "450.5", "450.50", "-12.25" and a leading currency
    /// symbol such as "₹450" or "Rs 450". More than two fraction digits is an
    /// error rather than a silent truncation.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s
            .trim_start_matches('₹')
            .trim_start_matches("Rs.")
            .trim_start_matches("Rs")
            .trim();

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: i64 = whole.parse().map_err(|_| invalid())?;
        let paise: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|r| r.checked_add(paise))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol, e.g. "₹450.00"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.rupees().abs(), self.paise_part())
        } else {
            format!("{}{}.{:02}", symbol, self.rupees(), self.paise_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.rupees().abs(), self.paise_part())
        } else {
            write!(f, "{}.{:02}", self.rupees(), self.paise_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Unit price times quantity
impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * i64::from(quantity))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let m = Money::from_paise(45050);
        assert_eq!(m.paise(), 45050);
        assert_eq!(m.rupees(), 450);
        assert_eq!(m.paise_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupees(450).to_string(), "450.00");
        assert_eq!(Money::from_paise(-1005).to_string(), "-10.05");
        assert_eq!(Money::from_paise(7).format_with_symbol("₹"), "₹0.07");
        assert_eq!(Money::from_paise(-1050).format_with_symbol("₹"), "-₹10.50");
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::from_rupees(45);
        assert_eq!((price * 3).paise(), 13500);
        assert_eq!((price - Money::from_rupees(5)).rupees(), 40);
        assert_eq!((-price).paise(), -4500);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("450").unwrap().paise(), 45000);
        assert_eq!(Money::parse("450.5").unwrap().paise(), 45050);
        assert_eq!(Money::parse("₹450.05").unwrap().paise(), 45005);
        assert_eq!(Money::parse("Rs 12").unwrap().paise(), 1200);
        assert_eq!(Money::parse("-12.25").unwrap().paise(), -1225);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".50").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = [1000, 2500, 50].into_iter().map(Money::from_paise).sum();
        assert_eq!(total.paise(), 3550);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_paise(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
        assert_eq!(serde_json::from_str::<Money>(&json).unwrap(), m);
    }
}
