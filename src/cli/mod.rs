//! Command-line interface for zman
//!
//! Provides `create-config`, `copy-files` and `config-stats` subcommands.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::settings::load_settings;

mod config_stats;
mod copy_files;
mod create_config;
mod prompt;
mod utils;

/// Manage ZOIA patches: build a patch config and copy numbered patches to an SD card
#[derive(Parser)]
#[command(name = "zman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./zman.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config from ZOIA patch files
    #[command(name = "create-config", visible_alias = "create_config")]
    CreateConfig(create_config::CreateConfigArgs),

    /// Copy patch files to a destination folder
    #[command(name = "copy-files", visible_alias = "copy_files")]
    CopyFiles(copy_files::CopyFilesArgs),

    /// Provide some stats about a config file
    #[command(name = "config-stats", visible_alias = "config_stats")]
    ConfigStats(config_stats::ConfigStatsArgs),

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment takes precedence; otherwise --verbose picks DEBUG over WARN.
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "zman", &mut std::io::stdout());
        return Ok(());
    }

    let work_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let settings = load_settings(&work_dir, cli.settings.as_deref())?;

    match cli.command {
        Commands::CreateConfig(args) => {
            let confirm = prompt::confirmer(args.force);
            create_config::run(args, &settings, confirm.as_ref())
        }
        Commands::CopyFiles(args) => {
            let confirm = prompt::confirmer(args.force);
            copy_files::run(args, &settings, confirm.as_ref())
        }
        Commands::ConfigStats(args) => config_stats::run(args, &settings),
        Commands::Completions { .. } => Ok(()),
    }
}
