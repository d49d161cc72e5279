//! Core data model: patch entries and the device slot layout

use crate::error::{Result, ZmanError};
use regex::Regex;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

pub const DEFAULT_PATCH_DIR: &str = "./patches";
pub const DEFAULT_DESTINATION_DIR: &str = "/Volumes/ZOIA/to_zoia";
pub const DEFAULT_CONFIG: &str = "zoia_patches.conf";
pub const DEFAULT_PATCH_EXTENSION: &str = "bin";

/// One discovered or configured patch.
///
/// Field order is alphabetical so the persisted document has sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchEntry {
    #[serde(default = "default_active")]
    pub active: bool,
    pub file_name: String,
    pub full_path: String,
    pub name: String,
    #[serde(default)]
    pub preferred_index: Option<u32>,
    /// Final slot computed by the assigner. Never persisted; a stored value is
    /// accepted on load and discarded.
    #[serde(default, skip_serializing, deserialize_with = "discard_assigned_index")]
    pub assigned_index: Option<u32>,
}

fn default_active() -> bool {
    true
}

fn discard_assigned_index<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| None)
}

impl PatchEntry {
    /// A freshly scanned entry: active, no preference.
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        full_path: impl Into<String>,
    ) -> Self {
        Self {
            active: true,
            file_name: file_name.into(),
            full_path: full_path.into(),
            name: name.into(),
            preferred_index: None,
            assigned_index: None,
        }
    }

    pub fn with_preferred_index(mut self, index: u32) -> Self {
        self.preferred_index = Some(index);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Slot numbering convention of the target device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLayout {
    /// Lowest valid slot number.
    pub first_slot: u32,
    /// Number of slots on one page of the device.
    pub slot_count: u32,
    /// Digits in the zero-padded slot prefix.
    pub prefix_width: usize,
    /// Tag between the slot number and the patch name, e.g. `000_zoia_name.bin`.
    pub prefix_tag: String,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self { first_slot: 0, slot_count: 64, prefix_width: 3, prefix_tag: "zoia".to_string() }
    }
}

impl SlotLayout {
    /// Highest valid slot number (inclusive).
    pub fn last_slot(&self) -> u32 {
        self.first_slot.saturating_add(self.slot_count.saturating_sub(1))
    }

    pub fn contains(&self, slot: u32) -> bool {
        slot >= self.first_slot && slot <= self.last_slot()
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 {
            return Err(ZmanError::InvalidSettings("device.slot_count must be positive".into()));
        }
        if self.prefix_width == 0 {
            return Err(ZmanError::InvalidSettings("device.prefix_width must be positive".into()));
        }
        if self.first_slot.checked_add(self.slot_count - 1).is_none() {
            return Err(ZmanError::InvalidSettings("device slot range overflows".into()));
        }
        let digits = self.last_slot().to_string().len();
        if digits > self.prefix_width {
            return Err(ZmanError::InvalidSettings(format!(
                "slot {} does not fit in a {}-digit prefix",
                self.last_slot(),
                self.prefix_width
            )));
        }
        if self.prefix_tag.is_empty() || self.prefix_tag.contains(|c: char| c == '/' || c == '\\') {
            return Err(ZmanError::InvalidSettings(format!(
                "invalid device.prefix_tag '{}'",
                self.prefix_tag
            )));
        }
        Ok(())
    }

    /// Destination file name for a patch placed in `slot`.
    pub fn file_name_for(&self, slot: u32, name: &str) -> String {
        format!("{:0width$}_{}_{}", slot, self.prefix_tag, name, width = self.prefix_width)
    }

    /// Pattern matching the slot prefix this layout writes, anchored at the start.
    pub fn prefix_regex(&self) -> Regex {
        let pattern = format!(r"^\d{{{}}}_{}_", self.prefix_width, regex::escape(&self.prefix_tag));
        Regex::new(&pattern).expect("escaped prefix pattern is valid")
    }

    /// Logical patch name for a file name, with any slot prefix removed.
    pub fn logical_name(&self, file_name: &str) -> String {
        self.prefix_regex().replace(file_name, "").into_owned()
    }
}
