//! Outbound bill delivery
//!
//! A [`MessageChannel`] takes a finished message, plus an optional image, and
//! reports where it went. The shipped [`OutboxChannel`] drops the message
//! into the outbox directory and builds the chat link for the customer's
//! phone; driving a browser or chat client is left to the operator.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{InvenGoPaths, Settings};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::normalize_phone;

const CHAT_LINK_BASE: &str = "https://wa.me/";

/// A rendered bill ready to go out
#[derive(Debug, Clone, Copy)]
pub struct OutboundMessage<'m> {
    pub bill_number: &'m str,
    pub phone: Option<&'m str>,
    pub text: &'m str,

    /// Sent ahead of the text, e.g. the shop logo
    pub image: Option<&'m Path>,
}

/// Where a message ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_file: PathBuf,
    pub image_file: Option<PathBuf>,

    /// Chat link for the customer, when the bill carries a phone number
    pub chat_link: Option<String>,
}

pub trait MessageChannel {
    fn send(&self, message: &OutboundMessage<'_>) -> InvenGoResult<DeliveryReceipt>;
}

/// Writes `<bill number>.txt` (and a copy of the image) into a directory
pub struct OutboxChannel {
    dir: PathBuf,
    dial_prefix: String,
}

impl OutboxChannel {
    pub fn new(dir: impl Into<PathBuf>, dial_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            dial_prefix: dial_prefix.into(),
        }
    }

    pub fn from_settings(paths: &InvenGoPaths, settings: &Settings) -> Self {
        Self::new(paths.outbox_dir(), settings.dial_prefix.clone())
    }

    /// Chat link for a phone; numbers starting with '+' already carry a country code
    pub fn chat_link(&self, phone: &str) -> InvenGoResult<String> {
        let phone = normalize_phone(phone).ok_or_else(|| {
            InvenGoError::Delivery(format!("'{}' is not a phone number", phone.trim()))
        })?;
        Ok(match phone.strip_prefix('+') {
            Some(international) => format!("{}{}", CHAT_LINK_BASE, international),
            None => format!("{}{}{}", CHAT_LINK_BASE, self.dial_prefix, phone),
        })
    }
}

impl MessageChannel for OutboxChannel {
    fn send(&self, message: &OutboundMessage<'_>) -> InvenGoResult<DeliveryReceipt> {
        let chat_link = message.phone.map(|p| self.chat_link(p)).transpose()?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            InvenGoError::Delivery(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let image_file = match message.image {
            Some(image) => {
                if !image.is_file() {
                    return Err(InvenGoError::Delivery(format!(
                        "Image {} does not exist",
                        image.display()
                    )));
                }
                let mut target = self.dir.join(message.bill_number);
                if let Some(ext) = image.extension() {
                    target.set_extension(ext);
                }
                fs::copy(image, &target).map_err(|e| {
                    InvenGoError::Delivery(format!("Failed to copy {}: {}", image.display(), e))
                })?;
                Some(target)
            }
            None => None,
        };

        let message_file = self.dir.join(format!("{}.txt", message.bill_number));
        fs::write(&message_file, message.text).map_err(|e| {
            InvenGoError::Delivery(format!("Failed to write {}: {}", message_file.display(), e))
        })?;

        info!(bill = message.bill_number, file = %message_file.display(), "bill message queued");
        Ok(DeliveryReceipt {
            message_file,
            image_file,
            chat_link,
        })
    }
}
