//! copy-files command implementation

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;

use super::prompt::Confirmer;
use super::utils::print_slot_plan;
use crate::assign::assign_slots;
use crate::export::{clean_destination, export_patches, numbered_files, FsCopier, PatchCopier};
use crate::settings::Settings;
use crate::store;

#[derive(Args)]
pub struct CopyFilesArgs {
    /// Destination patch dir (default from settings: /Volumes/ZOIA/to_zoia)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Config file (default from settings: zoia_patches.conf)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remove previously numbered patches from the destination first
    #[arg(long)]
    pub clean: bool,

    /// Print the slot plan without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Force deleting numbered patches in the destination without prompt
    #[arg(short = 'f', long)]
    pub force: bool,
}

pub fn run(args: CopyFilesArgs, settings: &Settings, confirm: &dyn Confirmer) -> Result<()> {
    copy_with(args, settings, confirm, &FsCopier)
}

fn copy_with(
    args: CopyFilesArgs,
    settings: &Settings,
    confirm: &dyn Confirmer,
    copier: &dyn PatchCopier,
) -> Result<()> {
    let config = args.config.unwrap_or_else(|| settings.config_path.clone());
    let dest_dir = args.dest_dir.unwrap_or_else(|| settings.destination_dir.clone());
    let layout = &settings.device;

    let entries = store::load(&config)?;
    let assignment = assign_slots(&entries, layout)?;

    if args.dry_run {
        println!("Would copy {} patches to {}:", assignment.len(), dest_dir.display());
        print_slot_plan(&assignment, layout);
        return Ok(());
    }

    if dest_dir.is_dir() {
        if args.clean {
            let stale = numbered_files(&dest_dir, layout)
                .with_context(|| format!("Cannot list {}", dest_dir.display()))?;
            if !stale.is_empty() {
                let prompt = format!(
                    "Going to delete {} existing patches in {}. Okay?",
                    stale.len(),
                    dest_dir.display()
                );
                if !confirm.confirm(&prompt)? {
                    println!("Nothing done.");
                    anyhow::bail!("Refused to clean {}", dest_dir.display());
                }
                let removed = clean_destination(&dest_dir, layout)
                    .with_context(|| format!("Cannot clean {}", dest_dir.display()))?;
                println!("Deleted {} patches from {}.", removed.len(), dest_dir.display());
            }
        }
    } else {
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("Cannot create {}", dest_dir.display()))?;
    }

    let progress = ProgressBar::new(assignment.len() as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?);
    let report = export_patches(&entries, &assignment, layout, &dest_dir, copier, |name| {
        progress.set_message(name.to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    if !assignment.displaced().is_empty() {
        println!("Moved from their preferred slot: {}", assignment.displaced().join(", "));
    }
    println!("Copied {} patches to {}.", report.copied.len(), dest_dir.display());

    if !report.is_success() {
        for failure in &report.failed {
            eprintln!("  {}", failure);
        }
        anyhow::bail!(
            "{} of {} patches failed to copy: {}",
            report.failed.len(),
            assignment.len(),
            report.failed_names().join(", ")
        );
    }
    Ok(())
}
