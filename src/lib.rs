//! zman: organize ZOIA patch files onto an SD card
//!
//! Scans a directory of downloaded patches, keeps a JSON config of which
//! patches are active and which slot each one prefers, and copies the active
//! patches to a destination with unique, zero-padded slot prefixes.

pub mod assign;
pub mod cli;
pub mod domain;
pub mod error;
pub mod export;
pub mod reconcile;
pub mod scan;
pub mod settings;
pub mod stats;
pub mod store;

pub use error::{Result, ZmanError};
