//! Tool settings loading
//!
//! Settings come from an optional TOML file (explicit `--settings FILE` or an
//! auto-discovered `zman.toml` in the working directory) layered over defaults.
//! CLI flags are applied on top by each command.

use crate::domain::{
    SlotLayout, DEFAULT_CONFIG, DEFAULT_DESTINATION_DIR, DEFAULT_PATCH_DIR,
    DEFAULT_PATCH_EXTENSION,
};
use crate::error::{Result, ZmanError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_CANDIDATES: [&str; 2] = ["zman.toml", ".zman.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned by `create-config`.
    pub patch_dir: PathBuf,
    /// Patch config read and written by every command.
    pub config_path: PathBuf,
    /// Where `copy-files` places numbered patches.
    pub destination_dir: PathBuf,
    /// Extension (without dot) of patch files.
    pub patch_extension: String,
    pub device: SlotLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            patch_dir: PathBuf::from(DEFAULT_PATCH_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG),
            destination_dir: PathBuf::from(DEFAULT_DESTINATION_DIR),
            patch_extension: DEFAULT_PATCH_EXTENSION.to_string(),
            device: SlotLayout::default(),
        }
    }
}

/// Load settings, falling back to defaults when no file is found.
///
/// An explicitly provided file must exist and parse. An auto-discovered one
/// that fails to parse is reported and ignored.
pub fn load_settings(work_dir: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let discovered = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_settings(work_dir),
    };

    let Some(settings_file) = discovered else {
        return Ok(Settings::default());
    };

    let parsed = fs::read_to_string(&settings_file)
        .map_err(|e| ZmanError::InvalidSettings(format!("{}: {}", settings_file.display(), e)))
        .and_then(|content| parse_settings(&content, &settings_file));

    match parsed {
        Ok(settings) => {
            tracing::debug!("Loaded settings from {}", settings_file.display());
            Ok(settings)
        }
        Err(e) if explicit.is_none() => {
            tracing::warn!(
                "Ignoring auto-discovered settings {}: {}",
                settings_file.display(),
                e
            );
            Ok(Settings::default())
        }
        Err(e) => Err(e),
    }
}

fn parse_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).map_err(|e| {
        ZmanError::InvalidSettings(format!("{}: {}", settings_file.display(), e))
    })?;
    settings.device.validate()?;
    let ext = settings.patch_extension.trim_start_matches('.');
    if ext.is_empty() {
        return Err(ZmanError::InvalidSettings("patch_extension must not be empty".into()));
    }
    Ok(Settings { patch_extension: ext.to_ascii_lowercase(), ..settings })
}

fn discover_settings(work_dir: &Path) -> Option<PathBuf> {
    SETTINGS_CANDIDATES.iter().map(|name| work_dir.join(name)).find(|path| path.is_file())
}
