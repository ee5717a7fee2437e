//! Configuration module for InvenGo
//!
//! - Data directory resolution
//! - Shop settings persistence

pub mod paths;
pub mod settings;

pub use paths::InvenGoPaths;
pub use settings::Settings;
