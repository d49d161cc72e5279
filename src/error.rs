//! Error types for zman

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ZmanError>;

#[derive(Debug, thiserror::Error)]
pub enum ZmanError {
    #[error("Patch directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Patch config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed reading patch config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse patch config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed writing patch config {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{active} active patches do not fit in {slot_count} device slots")]
    SlotSpaceExhausted { active: usize, slot_count: u32 },

    #[error("Failed copying {name}: {source}")]
    CopyFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl ZmanError {
    /// True when the error only says the config file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ZmanError::ConfigNotFound { .. })
    }
}
