//! User settings for InvenGo
//!
//! Manages shop preferences: bill numbering prefix, currency symbol, default
//! bill and message formats, and the contact lines printed on outbound bills.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::InvenGoPaths;
use crate::error::InvenGoError;
use crate::models::{BillFormat, MessageStyle};

/// User settings for InvenGo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fixed prefix of every issued bill number
    #[serde(default = "default_bill_prefix")]
    pub bill_prefix: String,

    /// Currency symbol used in all rendered amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Console width used for banners and right-aligned totals
    #[serde(default = "default_display_width")]
    pub display_width: usize,

    /// Default console/bill-row format
    #[serde(default)]
    pub bill_format: BillFormat,

    /// Default outbound message style
    #[serde(default)]
    pub message_style: MessageStyle,

    /// Whether professional messages list item codes
    #[serde(default)]
    pub include_full_details: bool,

    #[serde(default = "default_shop_name")]
    pub shop_name: String,

    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    #[serde(default = "default_website")]
    pub website: String,

    #[serde(default = "default_feedback_url")]
    pub feedback_url: String,

    /// Country dialing prefix prepended to customer phones in chat links
    #[serde(default = "default_dial_prefix")]
    pub dial_prefix: String,

    /// Image sent ahead of every outbound bill message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_bill_prefix() -> String {
    "INV".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_display_width() -> usize {
    60
}

fn default_shop_name() -> String {
    "InvenGo".to_string()
}

fn default_contact_email() -> String {
    "support@invengo.com".to_string()
}

fn default_website() -> String {
    "https://invengo.example.com".to_string()
}

fn default_feedback_url() -> String {
    "https://example.com/feedback".to_string()
}

fn default_dial_prefix() -> String {
    "91".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            bill_prefix: default_bill_prefix(),
            currency_symbol: default_currency(),
            display_width: default_display_width(),
            bill_format: BillFormat::default(),
            message_style: MessageStyle::default(),
            include_full_details: false,
            shop_name: default_shop_name(),
            contact_email: default_contact_email(),
            website: default_website(),
            feedback_url: default_feedback_url(),
            dial_prefix: default_dial_prefix(),
            logo_path: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &InvenGoPaths) -> Result<Self, InvenGoError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| InvenGoError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| InvenGoError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &InvenGoPaths) -> Result<(), InvenGoError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| InvenGoError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| InvenGoError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the bill numbering cannot work with
    pub fn validate(&self) -> Result<(), InvenGoError> {
        if self.bill_prefix.trim().is_empty() {
            return Err(InvenGoError::Config("bill_prefix cannot be empty".into()));
        }
        if self.bill_prefix.chars().any(char::is_whitespace) {
            return Err(InvenGoError::Config(
                "bill_prefix cannot contain whitespace".into(),
            ));
        }
        Ok(())
    }
}
