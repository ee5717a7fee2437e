//! Catalog item model

use serde::{Deserialize, Serialize};

use super::money::Money;

/// An item in the catalog, as read from one row of the stock sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item code (e.g. "ALM050")
    pub code: String,

    /// Product family code shared by every size of one product (e.g. "ALM")
    pub base_code: String,

    pub name: String,
    pub category: String,

    /// Pack size in grams
    pub size: u32,

    pub unit: String,
    pub mrp: Money,

    /// Selling price per pack
    pub price: Money,

    /// Cumulative units received
    pub stock_in: i64,

    /// Cumulative units sold
    pub stock_sold: i64,

    /// Row of this item in the stock sheet
    #[serde(skip)]
    pub row: u32,
}

impl Item {
    /// Units on hand. Negative after an explicit shortage override.
    pub fn balance(&self) -> i64 {
        self.stock_in - self.stock_sold
    }

    /// Size label used on bills and packaging notes, e.g. "500GM"
    pub fn size_label(&self) -> String {
        format!("{}{}", self.size, self.unit)
    }
}

/// Fields for a new catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub base_code: String,
    pub category: String,
    pub code: String,
    pub name: String,
    pub size: u32,
    pub unit: String,
    pub mrp: Money,
    pub price: Money,
    pub initial_stock: i64,
}

impl NewItem {
    /// Normalize the way the catalog expects: codes upper-case, names and
    /// categories trimmed, unit defaulting to grams.
    pub fn normalized(mut self) -> Self {
        self.base_code = self.base_code.trim().to_uppercase();
        self.code = self.code.trim().to_uppercase();
        self.category = self.category.trim().to_string();
        self.name = self.name.trim().to_string();
        self.unit = match self.unit.trim() {
            "" => "GM".to_string(),
            unit => unit.to_uppercase(),
        };
        self
    }

    /// Validate the fields of a new item
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.code.is_empty() {
            return Err(ItemValidationError::EmptyField("code"));
        }
        if self.code.chars().any(char::is_whitespace) {
            return Err(ItemValidationError::CodeWhitespace(self.code.clone()));
        }
        if self.name.is_empty() {
            return Err(ItemValidationError::EmptyField("name"));
        }
        if self.category.is_empty() {
            return Err(ItemValidationError::EmptyField("category"));
        }
        if self.price.is_negative() || self.mrp.is_negative() {
            return Err(ItemValidationError::NegativePrice);
        }
        if self.initial_stock < 0 {
            return Err(ItemValidationError::NegativeStock(self.initial_stock));
        }
        Ok(())
    }
}

/// Validation errors for new items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyField(&'static str),
    CodeWhitespace(String),
    NegativePrice,
    NegativeStock(i64),
}

impl std::fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "Item {} cannot be empty", field),
            Self::CodeWhitespace(code) => write!(f, "Item code '{}' contains whitespace", code),
            Self::NegativePrice => write!(f, "Prices cannot be negative"),
            Self::NegativeStock(n) => write!(f, "Initial stock cannot be negative: {}", n),
        }
    }
}

impl std::error::Error for ItemValidationError {}
