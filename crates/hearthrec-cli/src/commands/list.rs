//! List command implementation.

use anyhow::Result;
use hearthrec_core::{Config, Spooler};

use super::format_millis;

/// Print the spooled games, oldest first.
pub fn run(config: &Config) -> Result<()> {
    let spooler = Spooler::new(&config.spool_dir);
    let pending = spooler.list_pending();

    if pending.is_empty() {
        println!("No spooled games in {}", spooler.dir().display());
        return Ok(());
    }

    println!("{} spooled game(s) in {}", pending.len(), spooler.dir().display());
    for (record, handle) in &pending {
        println!(
            "  {}  {}  {:>5}s  {:>8} bytes",
            handle.file_name(),
            format_millis(record.start_time),
            record.duration_millis() / 1000,
            record.payload.len()
        );
    }
    Ok(())
}
