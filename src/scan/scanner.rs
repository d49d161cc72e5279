//! Patch directory scanner

use crate::domain::{PatchEntry, SlotLayout, DEFAULT_PATCH_EXTENSION};
use crate::error::{Result, ZmanError};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovers patch files in a single directory (no recursion).
pub struct PatchScanner {
    root_path: PathBuf,
    extension: String,
    layout: SlotLayout,
}

impl PatchScanner {
    /// Create a new PatchScanner with default settings.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            extension: DEFAULT_PATCH_EXTENSION.to_string(),
            layout: SlotLayout::default(),
        }
    }

    /// Set the patch file extension (with or without leading dot)
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Set the device layout used to strip slot prefixes from file names
    pub fn layout(mut self, layout: SlotLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Start scanning. Entries are produced lazily in file-name order.
    ///
    /// Fails up front when the directory is missing or unreadable.
    pub fn scan(&self) -> Result<PatchScan> {
        let unavailable = |source: std::io::Error| ZmanError::DirectoryUnavailable {
            path: self.root_path.clone(),
            source,
        };

        let metadata = fs::metadata(&self.root_path).map_err(unavailable)?;
        if !metadata.is_dir() {
            return Err(unavailable(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        fs::read_dir(&self.root_path).map_err(unavailable)?;

        let walker = WalkDir::new(&self.root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Ok(PatchScan {
            walker,
            extension: self.extension.clone(),
            prefix: self.layout.prefix_regex(),
            seen: HashSet::new(),
        })
    }
}

/// Lazy iterator over the patch files of one directory.
pub struct PatchScan {
    walker: walkdir::IntoIter,
    extension: String,
    prefix: Regex,
    seen: HashSet<String>,
}

impl PatchScan {
    fn entry_for(&mut self, path: &Path) -> Option<PatchEntry> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
            return None;
        };

        if file_name.starts_with('.') {
            return None;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        if ext != self.extension {
            tracing::debug!("Skipping {} (extension)", file_name);
            return None;
        }

        let name = self.prefix.replace(file_name, "").into_owned();
        if !self.seen.insert(name.clone()) {
            tracing::warn!("Skipping {}: another file already provides '{}'", file_name, name);
            return None;
        }

        let Some(full_path) = path.to_str() else {
            tracing::warn!("Skipping non UTF-8 path: {}", path.display());
            return None;
        };

        Some(PatchEntry::new(name, file_name, full_path))
    }
}

impl Iterator for PatchScan {
    type Item = PatchEntry;

    fn next(&mut self) -> Option<PatchEntry> {
        loop {
            let entry = match self.walker.next()? {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(patch) = self.entry_for(entry.path()) {
                return Some(patch);
            }
        }
    }
}
