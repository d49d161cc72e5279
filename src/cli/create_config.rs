//! create-config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::prompt::Confirmer;
use super::utils::same_file;
use crate::reconcile::reconcile;
use crate::scan::scan_patches;
use crate::settings::Settings;
use crate::store;

#[derive(Args)]
pub struct CreateConfigArgs {
    /// Patch dir (default from settings: ./patches)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub patch_dir: Option<PathBuf>,

    /// Output config file (default from settings: zoia_patches.conf)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_config: Option<PathBuf>,

    /// Existing config whose active flags and preferred indices are kept
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input_config: Option<PathBuf>,

    /// Force overwriting config without prompt
    #[arg(short = 'f', long)]
    pub force: bool,
}

pub fn run(args: CreateConfigArgs, settings: &Settings, confirm: &dyn Confirmer) -> Result<()> {
    let settings = Settings {
        patch_dir: args.patch_dir.unwrap_or_else(|| settings.patch_dir.clone()),
        ..settings.clone()
    };
    let output = args.output_config.unwrap_or_else(|| settings.config_path.clone());

    let scanned = scan_patches(&settings)
        .with_context(|| format!("Cannot scan patch dir {}", settings.patch_dir.display()))?;

    let entries = match &args.input_config {
        Some(input) => {
            let prior = store::load_or_empty(input)?;
            let (merged, report) = reconcile(scanned, &prior);
            println!(
                "Merged with {}: {} kept, {} new, {} removed.",
                input.display(),
                report.carried.len(),
                report.added.len(),
                report.dropped.len()
            );
            for name in &report.dropped {
                tracing::info!("Dropped {} (file no longer present)", name);
            }
            merged
        }
        None => reconcile(scanned, &[]).0,
    };

    let updating_in_place =
        args.input_config.as_deref().is_some_and(|input| same_file(input, &output));
    if output.exists() && !updating_in_place {
        let prompt = format!("The file '{}' already exists. Overwrite?", output.display());
        if !confirm.confirm(&prompt)? {
            println!("Nothing done.");
            anyhow::bail!("Refused to overwrite {}", output.display());
        }
    }

    store::save(&output, &entries)?;
    println!("Wrote patch config to {}.", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::testing::ScriptedConfirmer;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Settings) {
        let tmp = TempDir::new().expect("tmp");
        let patches = tmp.path().join("patches");
        fs::create_dir(&patches).expect("mkdir");
        for name in ["000_zoia_foobar.bin", "001_zoia_barfoo.bin", "001_zoia_barbar.bin"] {
            fs::write(patches.join(name), name).expect("write");
        }
        let settings = Settings {
            patch_dir: patches,
            config_path: tmp.path().join("zoia_patches.conf"),
            ..Settings::default()
        };
        (tmp, settings)
    }

    fn args() -> CreateConfigArgs {
        CreateConfigArgs { patch_dir: None, output_config: None, input_config: None, force: false }
    }

    #[test]
    fn writes_new_config_without_prompting() {
        let (_tmp, settings) = fixture();
        let confirm = ScriptedConfirmer::new(false);

        run(args(), &settings, &confirm).expect("create");

        let entries = store::load(&settings.config_path).expect("load");
        assert_eq!(entries.len(), 3);
        assert!(confirm.prompts.borrow().is_empty());
    }

    #[test]
    fn declined_overwrite_leaves_file_untouched() {
        let (_tmp, settings) = fixture();
        fs::write(&settings.config_path, "keep me").expect("write");
        let confirm = ScriptedConfirmer::new(false);

        assert!(run(args(), &settings, &confirm).is_err());
        assert_eq!(fs::read_to_string(&settings.config_path).expect("read"), "keep me");
        assert_eq!(confirm.prompts.borrow().len(), 1);
    }

    #[test]
    fn merging_in_place_keeps_preferences_without_prompt() {
        let (_tmp, settings) = fixture();
        run(args(), &settings, &ScriptedConfirmer::new(true)).expect("create");

        let mut entries = store::load(&settings.config_path).expect("load");
        for entry in &mut entries {
            match entry.name.as_str() {
                "barfoo.bin" => entry.active = false,
                "barbar.bin" => entry.preferred_index = Some(60),
                _ => {}
            }
        }
        store::save(&settings.config_path, &entries).expect("save");
        fs::remove_file(settings.patch_dir.join("000_zoia_foobar.bin")).expect("rm");
        fs::write(settings.patch_dir.join("newone.bin"), "n").expect("write");

        let confirm = ScriptedConfirmer::new(false);
        let merge = CreateConfigArgs { input_config: Some(settings.config_path.clone()), ..args() };
        run(merge, &settings, &confirm).expect("merge");

        assert!(confirm.prompts.borrow().is_empty());
        let merged = store::load(&settings.config_path).expect("load");
        let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["barbar.bin", "barfoo.bin", "newone.bin"]);
        assert_eq!(merged[0].preferred_index, Some(60));
        assert!(!merged[1].active);
        assert!(merged[2].active);
    }

    #[test]
    fn missing_input_config_starts_empty() {
        let (tmp, settings) = fixture();
        let merge = CreateConfigArgs { input_config: Some(tmp.path().join("absent.conf")), ..args() };
        run(merge, &settings, &ScriptedConfirmer::new(false)).expect("create");
        assert_eq!(store::load(&settings.config_path).expect("load").len(), 3);
    }

    #[test]
    fn missing_patch_dir_is_fatal() {
        let (tmp, settings) = fixture();
        let bad = CreateConfigArgs { patch_dir: Some(tmp.path().join("nope")), ..args() };
        assert!(run(bad, &settings, &ScriptedConfirmer::new(true)).is_err());
        assert!(!settings.config_path.exists());
    }
}
