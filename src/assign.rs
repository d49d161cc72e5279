//! Slot assignment
//!
//! Preferred entries are placed first, in order of requested slot then name,
//! each taking the lowest free slot at or above its request. The remaining
//! active entries fill the lowest free slots in name order.

use crate::domain::{PatchEntry, SlotLayout};
use crate::error::{Result, ZmanError};
use std::collections::{BTreeMap, BTreeSet};

/// Final slot for every active patch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assignment {
    by_slot: BTreeMap<u32, String>,
    by_name: BTreeMap<String, u32>,
    displaced: Vec<String>,
}

impl Assignment {
    pub fn slot_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// `(slot, name)` pairs in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.by_slot.iter().map(|(slot, name)| (*slot, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    /// Preferred patches that did not get their exact requested slot.
    pub fn displaced(&self) -> &[String] {
        &self.displaced
    }

    /// Copy assigned slots onto `entries`; unassigned entries get `None`.
    pub fn annotate(&self, entries: &mut [PatchEntry]) {
        for entry in entries {
            entry.assigned_index = self.slot_of(&entry.name);
        }
    }

    fn insert(&mut self, slot: u32, name: &str) {
        self.by_slot.insert(slot, name.to_string());
        self.by_name.insert(name.to_string(), slot);
    }
}

/// Compute unique slots for the active entries.
///
/// Fails with [`ZmanError::SlotSpaceExhausted`] when there are more active
/// entries than the device has slots.
pub fn assign_slots(entries: &[PatchEntry], layout: &SlotLayout) -> Result<Assignment> {
    let active: Vec<&PatchEntry> = entries.iter().filter(|e| e.active).collect();
    if active.len() > layout.slot_count as usize {
        return Err(ZmanError::SlotSpaceExhausted {
            active: active.len(),
            slot_count: layout.slot_count,
        });
    }

    let (mut preferred, mut unpreferred): (Vec<&PatchEntry>, Vec<&PatchEntry>) =
        active.into_iter().partition(|e| e.preferred_index.is_some());
    preferred.sort_by(|a, b| {
        a.preferred_index.cmp(&b.preferred_index).then_with(|| a.name.cmp(&b.name))
    });

    let last = layout.last_slot();
    let mut taken: BTreeSet<u32> = BTreeSet::new();
    let mut assignment = Assignment::default();

    for entry in preferred {
        let Some(requested) = entry.preferred_index else { continue };
        let slot = if layout.contains(requested) {
            lowest_free(&taken, requested, last)
        } else {
            None
        };

        match slot {
            Some(slot) => {
                if slot != requested {
                    tracing::info!(
                        "Patch {} wanted slot {} but it is taken; using {}",
                        entry.name,
                        requested,
                        slot
                    );
                    assignment.displaced.push(entry.name.clone());
                }
                taken.insert(slot);
                assignment.insert(slot, &entry.name);
            }
            None => {
                tracing::warn!(
                    "Patch {} wants slot {} but no free slot in {}..={} is at or above it; \
                     numbering it with the rest",
                    entry.name,
                    requested,
                    layout.first_slot,
                    layout.last_slot()
                );
                assignment.displaced.push(entry.name.clone());
                unpreferred.push(entry);
            }
        }
    }

    unpreferred.sort_by(|a, b| a.name.cmp(&b.name));
    let mut cursor = layout.first_slot;
    for entry in unpreferred {
        // Active count was checked against slot count, so a free slot remains.
        let Some(slot) = lowest_free(&taken, cursor, last) else {
            return Err(ZmanError::SlotSpaceExhausted {
                active: assignment.len() + 1,
                slot_count: layout.slot_count,
            });
        };
        taken.insert(slot);
        cursor = slot;
        assignment.insert(slot, &entry.name);
    }

    tracing::debug!(
        "Assigned {} slots ({} displaced from their preferred slot)",
        assignment.len(),
        assignment.displaced.len()
    );
    Ok(assignment)
}

/// Lowest slot in `from..=last` not in `taken`.
///
/// Walks only the taken slots, so the cost is bounded by the number of
/// assigned entries rather than the size of the slot range.
fn lowest_free(taken: &BTreeSet<u32>, from: u32, last: u32) -> Option<u32> {
    let mut slot = from;
    for &used in taken.range(from..) {
        if used != slot {
            break;
        }
        if slot == last {
            return None;
        }
        slot += 1;
    }
    (slot <= last).then_some(slot)
}
