//! Customer account model

use serde::{Deserialize, Serialize};

use super::money::Money;

/// A customer identified by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,

    /// Cumulative spend, net of discounts
    pub total: Money,

    /// Bill numbers in the order they were issued
    pub bills: Vec<String>,

    /// Row of this customer in the customer sheet
    #[serde(skip)]
    pub row: u32,
}

impl Customer {
    pub fn bill_count(&self) -> usize {
        self.bills.len()
    }
}

/// Normalize a phone number for lookups: keep digits and a leading '+'
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '0'..='9' => out.push(c),
            '+' if i == 0 => out.push(c),
            ' ' | '-' => {}
            _ => return None,
        }
    }
    if out.trim_start_matches('+').is_empty() {
        None
    } else {
        Some(out)
    }
}
