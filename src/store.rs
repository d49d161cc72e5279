//! Patch config persistence
//!
//! The config is a JSON array of patch records with alphabetically ordered
//! keys, indented by four spaces and sorted by patch name.

use crate::domain::PatchEntry;
use crate::error::{Result, ZmanError};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read a patch config.
///
/// A missing file yields [`ZmanError::ConfigNotFound`] so callers can treat it
/// as an empty configuration.
pub fn load(path: &Path) -> Result<Vec<PatchEntry>> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ZmanError::ConfigNotFound { path: path.to_path_buf() },
        _ => ZmanError::ConfigRead { path: path.to_path_buf(), source },
    })?;
    parse(&content, path)
}

/// Like [`load`], but a missing file is an empty configuration.
pub fn load_or_empty(path: &Path) -> Result<Vec<PatchEntry>> {
    match load(path) {
        Err(e) if e.is_not_found() => {
            tracing::warn!("No patch config at {}; starting from empty", path.display());
            Ok(Vec::new())
        }
        other => other,
    }
}

fn parse(content: &str, path: &Path) -> Result<Vec<PatchEntry>> {
    let entries: Vec<PatchEntry> = serde_json::from_str(content)
        .map_err(|e| ZmanError::ConfigParse { path: path.to_path_buf(), message: e.to_string() })?;

    let mut names = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if !names.insert(entry.name.as_str()) {
            return Err(ZmanError::ConfigParse {
                path: path.to_path_buf(),
                message: format!("duplicate patch name '{}'", entry.name),
            });
        }
    }

    tracing::debug!("Loaded {} patches from {}", entries.len(), path.display());
    Ok(entries)
}

/// Serialize entries in their canonical form: sorted by name, keys sorted.
pub fn render(entries: &[PatchEntry]) -> std::io::Result<String> {
    let mut sorted: Vec<&PatchEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    sorted.serialize(&mut ser)?;
    buf.push(b'\n');

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write entries to `path`, replacing any existing file.
///
/// The document goes to a sibling temporary file first and is renamed into
/// place, so an interrupted save leaves the previous config intact.
pub fn save(path: &Path, entries: &[PatchEntry]) -> Result<()> {
    let write_err =
        |source: std::io::Error| ZmanError::ConfigWrite { path: path.to_path_buf(), source };
    let content = render(entries).map_err(write_err)?;

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, content).map_err(write_err)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    tracing::info!("Wrote {} patches to {}", entries.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
