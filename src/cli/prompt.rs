//! Yes/no confirmation prompts.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::IsTerminal;

/// Asks the user to approve a destructive step.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the terminal; declines when stdin is not a terminal.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            tracing::warn!("Not a terminal; declining \"{}\" (pass --force to skip it)", prompt);
            return Ok(false);
        }
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Approves everything; used for `--force`.
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::debug!("Assuming yes: {}", prompt);
        Ok(true)
    }
}

/// Pick the confirmer for a command's `--force` flag.
pub fn confirmer(force: bool) -> Box<dyn Confirmer> {
    if force {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmer)
    }
}
