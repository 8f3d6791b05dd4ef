//! Replay command implementation.

use anyhow::Result;
use hearthrec_core::Config;

/// Upload every spooled game once and exit.
pub fn run(config: &Config) -> Result<()> {
    let delivery = super::build_delivery(config)?;
    println!("Replaying spool in {}", delivery.spooler().dir().display());

    let summary = delivery.replay_spool();
    if summary.total() == 0 {
        println!("Nothing to upload.");
    } else {
        println!("{}", summary);
    }
    Ok(())
}
