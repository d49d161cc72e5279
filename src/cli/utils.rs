//! Shared CLI utilities.

use crate::assign::Assignment;
use crate::domain::SlotLayout;
use std::path::Path;

/// True when both paths name the same file, resolving symlinks and `..` when
/// the files exist.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Print the slot plan, one `slot  destination-name` line per patch.
pub fn print_slot_plan(assignment: &Assignment, layout: &SlotLayout) {
    for (slot, name) in assignment.iter() {
        let width = layout.prefix_width;
        println!("  {:>width$}  {}", slot, layout.file_name_for(slot, name), width = width);
    }
}
