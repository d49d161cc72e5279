//! Summary statistics for a patch config

use crate::domain::PatchEntry;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigStats {
    pub total: usize,
    pub active: usize,
    /// Requested slot -> patch names asking for it, names sorted.
    pub preferred: BTreeMap<u32, Vec<String>>,
}

impl ConfigStats {
    pub fn from_entries(entries: &[PatchEntry]) -> Self {
        let mut preferred: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for entry in entries {
            if let Some(index) = entry.preferred_index {
                preferred.entry(index).or_default().push(entry.name.clone());
            }
        }
        for names in preferred.values_mut() {
            names.sort();
        }

        Self {
            total: entries.len(),
            active: entries.iter().filter(|e| e.active).count(),
            preferred,
        }
    }

    pub fn preferred_count(&self) -> usize {
        self.preferred.values().map(Vec::len).sum()
    }

    /// Slots requested by more than one patch.
    pub fn conflicts(&self) -> impl Iterator<Item = u32> + '_ {
        self.preferred.iter().filter(|(_, names)| names.len() > 1).map(|(slot, _)| *slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_conflicts() {
        let entries = vec![
            PatchEntry::new("a", "a", "a").with_preferred_index(0),
            PatchEntry::new("c", "c", "c").with_preferred_index(5),
            PatchEntry::new("b", "b", "b").with_preferred_index(5).inactive(),
            PatchEntry::new("d", "d", "d"),
        ];

        let stats = ConfigStats::from_entries(&entries);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.preferred_count(), 3);
        assert_eq!(stats.preferred[&0], vec!["a"]);
        assert_eq!(stats.preferred[&5], vec!["b", "c"]);
        assert_eq!(stats.conflicts().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn empty_config() {
        let stats = ConfigStats::from_entries(&[]);
        assert_eq!(stats, ConfigStats::default());
        assert_eq!(stats.conflicts().count(), 0);
    }
}
