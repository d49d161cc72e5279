//! config-stats command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::settings::Settings;
use crate::stats::ConfigStats;
use crate::store;

#[derive(Args)]
pub struct ConfigStatsArgs {
    /// Config file (default from settings: zoia_patches.conf)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConfigStatsArgs, settings: &Settings) -> Result<()> {
    let config = args.config.unwrap_or_else(|| settings.config_path.clone());
    let entries = store::load(&config)?;
    let stats = ConfigStats::from_entries(&entries);

    println!("{}", config.display());
    println!();
    println!("total patches: {}", stats.total);
    println!("active patches: {}", stats.active);
    println!();
    println!("patches with preferred index: {}", stats.preferred_count());
    for (index, names) in &stats.preferred {
        let marker = if names.len() > 1 { style("*").red().bold() } else { style(" ") };
        for name in names {
            println!("\t{}[{}] {}", marker, index, name);
        }
    }

    let conflicts: Vec<String> = stats.conflicts().map(|slot| slot.to_string()).collect();
    if !conflicts.is_empty() {
        tracing::info!("Conflicting preferred indices: {}", conflicts.join(", "));
    }
    Ok(())
}
