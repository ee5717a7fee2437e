//! Accounts summary and expense models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bill::PaymentMode;
use super::money::Money;

/// The four running sale/discount totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsSummary {
    pub cash_sale: Money,
    pub digital_sale: Money,
    pub cash_discount: Money,
    pub digital_discount: Money,
}

impl AccountsSummary {
    pub fn total_sales(&self) -> Money {
        self.cash_sale + self.digital_sale
    }

    pub fn total_discounts(&self) -> Money {
        self.cash_discount + self.digital_discount
    }

    /// Sales net of discounts
    pub fn net_sales(&self) -> Money {
        self.total_sales() - self.total_discounts()
    }

    pub fn sale_for(&self, mode: PaymentMode) -> Money {
        match mode {
            PaymentMode::Cash => self.cash_sale,
            PaymentMode::Digital => self.digital_sale,
        }
    }

    pub fn discount_for(&self, mode: PaymentMode) -> Money {
        match mode {
            PaymentMode::Cash => self.cash_discount,
            PaymentMode::Digital => self.digital_discount,
        }
    }
}

/// One entry of the expense log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: Money,
    pub description: String,

    /// Absent on entries written before dates were recorded
    pub date: Option<NaiveDate>,

    #[serde(skip)]
    pub row: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let summary = AccountsSummary {
            cash_sale: Money::from_rupees(500),
            digital_sale: Money::from_rupees(300),
            cash_discount: Money::from_rupees(50),
            digital_discount: Money::zero(),
        };
        assert_eq!(summary.total_sales(), Money::from_rupees(800));
        assert_eq!(summary.total_discounts(), Money::from_rupees(50));
        assert_eq!(summary.net_sales(), Money::from_rupees(750));
        assert_eq!(summary.sale_for(PaymentMode::Digital), Money::from_rupees(300));
        assert_eq!(summary.discount_for(PaymentMode::Cash), Money::from_rupees(50));
    }
}
