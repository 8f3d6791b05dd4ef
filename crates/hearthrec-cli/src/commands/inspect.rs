//! Inspect command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hearthrec_core::codec;
use hearthrec_core::storage::parse_spool_file_name;
use tracing::warn;

use super::format_millis;

/// Print the metadata and text of one spooled game.
pub fn run(file: &Path) -> Result<()> {
    let payload =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let text = codec::decompress(&payload)
        .with_context(|| format!("{} is not a recorded game", file.display()))?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!("File:       {}", file.display());
    match parse_spool_file_name(&name) {
        Ok((start_time, end_time)) => {
            println!("Started:    {}", format_millis(start_time));
            println!("Ended:      {}", format_millis(end_time));
            println!(
                "Duration:   {}s",
                end_time.saturating_sub(start_time) / 1000
            );
        }
        Err(e) => warn!("{}", e),
    }
    println!("Compressed: {} bytes", payload.len());
    println!("Text:       {} bytes, {} lines", text.len(), text.lines().count());
    println!();
    print!("{}", text);
    Ok(())
}
