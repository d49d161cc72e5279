//! Merge a fresh directory scan with a previously saved patch config.

use crate::domain::PatchEntry;
use std::cmp::Ordering;

/// What changed between the prior config and the fresh scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Scanned patches with no prior entry.
    pub added: Vec<String>,
    /// Prior entries whose file is gone.
    pub dropped: Vec<String>,
    /// Patches whose user settings were carried over.
    pub carried: Vec<String>,
}

/// Merge `scanned` with `prior`, keyed by patch name.
///
/// Matching entries keep `active` and `preferred_index` from `prior` and the
/// path fields from `scanned`. Unmatched scanned entries are kept as scanned,
/// unmatched prior entries are dropped. The result is sorted by name.
pub fn reconcile(
    mut scanned: Vec<PatchEntry>,
    prior: &[PatchEntry],
) -> (Vec<PatchEntry>, ReconcileReport) {
    scanned.sort_by(|a, b| a.name.cmp(&b.name));
    let mut prior_sorted: Vec<&PatchEntry> = prior.iter().collect();
    prior_sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut report = ReconcileReport::default();
    let mut merged = Vec::with_capacity(scanned.len());
    let mut old = prior_sorted.into_iter().peekable();

    for mut entry in scanned {
        let mut matched = false;
        while let Some(previous) = old.peek() {
            match previous.name.cmp(&entry.name) {
                Ordering::Less => {
                    report.dropped.push(previous.name.clone());
                    old.next();
                }
                Ordering::Equal => {
                    entry.active = previous.active;
                    entry.preferred_index = previous.preferred_index;
                    matched = true;
                    old.next();
                    break;
                }
                Ordering::Greater => break,
            }
        }

        if matched {
            report.carried.push(entry.name.clone());
        } else {
            report.added.push(entry.name.clone());
        }
        merged.push(entry);
    }
    report.dropped.extend(old.map(|previous| previous.name.clone()));

    tracing::debug!(
        "Reconciled {} patches: {} added, {} dropped, {} carried over",
        merged.len(),
        report.added.len(),
        report.dropped.len(),
        report.carried.len()
    );
    (merged, report)
}
