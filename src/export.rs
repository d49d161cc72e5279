//! Copy assigned patches into a destination directory.

use crate::assign::Assignment;
use crate::domain::{PatchEntry, SlotLayout};
use crate::error::ZmanError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Byte-for-byte copy of one file.
pub trait PatchCopier {
    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Copies with [`std::fs::copy`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl PatchCopier for FsCopier {
    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
        fs::copy(source, destination).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedPatch {
    pub slot: u32,
    pub name: String,
    pub destination: PathBuf,
}

/// Outcome of an export: every active patch is either copied or failed.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub copied: Vec<CopiedPatch>,
    pub failed: Vec<ZmanError>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Names of the patches that failed to copy.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed
            .iter()
            .filter_map(|e| match e {
                ZmanError::CopyFailed { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Copy every assigned patch into `dest_dir` as `<slot>_<tag>_<name>`.
///
/// A failed copy is recorded and the remaining patches are still attempted.
/// `on_progress` is called once per patch, after its copy has finished or failed.
pub fn export_patches(
    entries: &[PatchEntry],
    assignment: &Assignment,
    layout: &SlotLayout,
    dest_dir: &Path,
    copier: &dyn PatchCopier,
    mut on_progress: impl FnMut(&str),
) -> ExportReport {
    let sources: HashMap<&str, &PatchEntry> =
        entries.iter().filter(|e| e.active).map(|e| (e.name.as_str(), e)).collect();
    let mut report = ExportReport::default();

    for (slot, name) in assignment.iter() {
        let Some(entry) = sources.get(name) else {
            report.failed.push(ZmanError::CopyFailed {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no active config entry"),
            });
            on_progress(name);
            continue;
        };

        let destination = dest_dir.join(layout.file_name_for(slot, name));
        match copier.copy(Path::new(&entry.full_path), &destination) {
            Ok(()) => {
                tracing::debug!("Created {}", destination.display());
                report.copied.push(CopiedPatch { slot, name: name.to_string(), destination });
            }
            Err(source) => {
                tracing::warn!("Failed copying {} to {}: {}", name, destination.display(), source);
                report.failed.push(ZmanError::CopyFailed { name: name.to_string(), source });
            }
        }
        on_progress(name);
    }

    tracing::info!(
        "Exported {} patches to {} ({} failed)",
        report.copied.len(),
        dest_dir.display(),
        report.failed.len()
    );
    report
}

/// Files in `dest_dir` that carry this layout's slot prefix.
///
/// Hidden files and anything not named like an exported patch are left out.
pub fn numbered_files(dest_dir: &Path, layout: &SlotLayout) -> io::Result<Vec<PathBuf>> {
    let prefix = layout.prefix_regex();
    let mut found = Vec::new();
    for entry in fs::read_dir(dest_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else { continue };
        if name.starts_with('.') || !prefix.is_match(name) {
            continue;
        }
        found.push(entry.path());
    }
    found.sort();
    Ok(found)
}

/// Remove previously exported patches from `dest_dir`.
///
/// Returns the removed paths.
pub fn clean_destination(dest_dir: &Path, layout: &SlotLayout) -> io::Result<Vec<PathBuf>> {
    let stale = numbered_files(dest_dir, layout)?;
    for path in &stale {
        tracing::debug!("Deleting {}", path.display());
        fs::remove_file(path)?;
    }
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::assign_slots;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Fails for one named source file, copies everything else.
    struct FlakyCopier {
        fail_on: &'static str,
    }

    impl PatchCopier for FlakyCopier {
        fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
            if source.file_name().and_then(|n| n.to_str()) == Some(self.fail_on) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "card is read-only"));
            }
            FsCopier.copy(source, destination)
        }
    }

    fn write_patches(dir: &Path, names: &[&str]) -> Vec<PatchEntry> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, format!("bytes of {}", name)).expect("write patch");
                PatchEntry::new(*name, *name, path.to_str().expect("utf8"))
            })
            .collect()
    }

    #[test]
    fn copies_active_patches_with_slot_prefix() {
        let src = TempDir::new().expect("src");
        let dest = TempDir::new().expect("dest");
        let mut entries = write_patches(src.path(), &["foobar.bin", "barfoo.bin", "barbar.bin"]);
        entries[1].active = false;
        entries[2].preferred_index = Some(60);
        let layout = SlotLayout::default();
        let assignment = assign_slots(&entries, &layout).expect("assign");

        let mut seen = Vec::new();
        let report = export_patches(&entries, &assignment, &layout, dest.path(), &FsCopier, |n| {
            seen.push(n.to_string())
        });

        assert!(report.is_success());
        assert_eq!(report.copied.len(), 2);
        assert_eq!(seen, vec!["foobar.bin", "barbar.bin"]);
        let copied = fs::read_to_string(dest.path().join("060_zoia_barbar.bin")).expect("read");
        assert_eq!(copied, "bytes of barbar.bin");
        assert!(dest.path().join("000_zoia_foobar.bin").exists());
        assert!(!dest.path().join("001_zoia_barfoo.bin").exists());
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let src = TempDir::new().expect("src");
        let dest = TempDir::new().expect("dest");
        let entries = write_patches(src.path(), &["Alpha.bin", "Bad.bin", "Zulu.bin"]);
        let layout = SlotLayout::default();
        let assignment = assign_slots(&entries, &layout).expect("assign");

        let copier = FlakyCopier { fail_on: "Bad.bin" };
        let report = export_patches(&entries, &assignment, &layout, dest.path(), &copier, |_| {});

        assert!(!report.is_success());
        assert_eq!(report.failed_names(), vec!["Bad.bin"]);
        assert_eq!(report.copied.len(), 2);
        assert!(dest.path().join("000_zoia_Alpha.bin").exists());
        assert!(dest.path().join("002_zoia_Zulu.bin").exists());
    }

    #[test]
    fn missing_source_is_reported_as_copy_failure() {
        let dest = TempDir::new().expect("dest");
        let entries = vec![PatchEntry::new("ghost.bin", "ghost.bin", "/nonexistent/ghost.bin")];
        let layout = SlotLayout::default();
        let assignment = assign_slots(&entries, &layout).expect("assign");

        let report = export_patches(&entries, &assignment, &layout, dest.path(), &FsCopier, |_| {});
        assert!(matches!(report.failed.as_slice(), [ZmanError::CopyFailed { name, .. }] if name == "ghost.bin"));
    }

    /// Records each copy into a shared event log.
    struct LoggingCopier<'a> {
        events: &'a RefCell<Vec<String>>,
    }

    impl PatchCopier for LoggingCopier<'_> {
        fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
            let name = source.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            self.events.borrow_mut().push(format!("copy {}", name));
            FsCopier.copy(source, destination)
        }
    }

    #[test]
    fn progress_is_reported_after_each_copy() {
        let src = TempDir::new().expect("src");
        let dest = TempDir::new().expect("dest");
        let entries = write_patches(src.path(), &["a.bin", "b.bin"]);
        let layout = SlotLayout::default();
        let assignment = assign_slots(&entries, &layout).expect("assign");

        let events = RefCell::new(Vec::new());
        let copier = LoggingCopier { events: &events };
        export_patches(&entries, &assignment, &layout, dest.path(), &copier, |name| {
            events.borrow_mut().push(format!("done {}", name))
        });

        assert_eq!(
            events.into_inner(),
            vec!["copy a.bin", "done a.bin", "copy b.bin", "done b.bin"]
        );
    }

    #[test]
    fn clean_removes_only_numbered_patches() {
        let dest = TempDir::new().expect("dest");
        for name in ["000_zoia_a.bin", "063_zoia_b.bin", "readme.txt", ".Spotlight", "1_zoia_c.bin"] {
            fs::write(dest.path().join(name), "x").expect("write");
        }
        fs::create_dir(dest.path().join("001_zoia_dir")).expect("mkdir");

        let removed = clean_destination(dest.path(), &SlotLayout::default()).expect("clean");

        assert_eq!(removed.len(), 2);
        assert!(!dest.path().join("000_zoia_a.bin").exists());
        assert!(!dest.path().join("063_zoia_b.bin").exists());
        assert!(dest.path().join("readme.txt").exists());
        assert!(dest.path().join(".Spotlight").exists());
        assert!(dest.path().join("1_zoia_c.bin").exists());
        assert!(dest.path().join("001_zoia_dir").is_dir());
    }
}
