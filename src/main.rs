//! zman: organize ZOIA patch files onto an SD card
//!
//! Builds a patch config from a directory of downloaded patches and copies the
//! active ones to the card with stable slot numbers.

use anyhow::Result;

fn main() -> Result<()> {
    zman::cli::run()
}
