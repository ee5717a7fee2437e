//! Custom error types for InvenGo
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for InvenGo operations
#[derive(Error, Debug)]
pub enum InvenGoError {
    /// A cell was read or accumulated before it was ever initialized
    #[error("Cell not initialized: {address}")]
    AddressNotFound { address: String },

    /// Item code is not in the catalog
    #[error("Unknown item code: {0}")]
    UnknownCode(String),

    /// Item code is already in the catalog
    #[error("Item code already exists: {0}")]
    DuplicateCode(String),

    /// Malformed quantity, amount or answer from an input source
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Workbook structure errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Outbound message delivery errors
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl InvenGoError {
    /// Create an "address not found" error for a cell reference
    pub fn address_not_found(address: impl ToString) -> Self {
        Self::AddressNotFound {
            address: address.to_string(),
        }
    }

    /// Create a "not found" error for bills
    pub fn bill_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for customers
    pub fn customer_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Customer",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::UnknownCode(_) | Self::AddressNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for InvenGoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InvenGoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for InvenGoError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for InvenGo operations
pub type InvenGoResult<T> = Result<T, InvenGoError>;
