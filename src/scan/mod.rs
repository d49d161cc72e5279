//! Patch directory scanning

use crate::domain::PatchEntry;
use crate::error::Result;
use crate::settings::Settings;

pub mod scanner;

pub use scanner::{PatchScan, PatchScanner};

/// Scan the configured patch directory and collect every entry.
pub fn scan_patches(settings: &Settings) -> Result<Vec<PatchEntry>> {
    let scanner = PatchScanner::new(settings.patch_dir.clone())
        .extension(&settings.patch_extension)
        .layout(settings.device.clone());
    let entries: Vec<PatchEntry> = scanner.scan()?.collect();
    tracing::info!("Found {} patches in {}", entries.len(), settings.patch_dir.display());
    Ok(entries)
}
