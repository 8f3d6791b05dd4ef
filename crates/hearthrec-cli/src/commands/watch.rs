//! Main watch mode command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use hearthrec_core::{
    Config, DeliveryWorker, GameRecorder, LineSource, LogTailer, configure_loggers,
};
use tracing::{debug, error, info, warn};

use crate::shutdown::ShutdownSignal;

/// Tail the game log until Ctrl+C, uploading every finished game.
pub fn run(config: &Config, log_config: Option<&Path>, from_start: bool) -> Result<()> {
    println!("hearthrec v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = log_config.or(config.log_config_file.as_deref())
        && let Err(e) = configure_loggers(path)
    {
        warn!("Failed to update {}: {}", path.display(), e);
    }

    let mut tailer = match LogTailer::open(&config.log_file, config.tail_from_end && !from_start) {
        Ok(tailer) => tailer,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let delivery = super::build_delivery(config)?;
    let shutdown = setup_shutdown_handler()?;
    let worker = DeliveryWorker::spawn(delivery, config.queue_capacity)?;

    info!("Watching {}", config.log_file.display());
    println!("Recording games... (Press Ctrl+C to quit)");

    let mut recorder = GameRecorder::new();
    let mut recorded = 0usize;
    while !shutdown.is_shutdown() {
        match tailer.poll_lines() {
            Ok(lines) => {
                for line in lines {
                    if let Some(record) = recorder.handle_line(&line) {
                        recorded += 1;
                        debug!(
                            "Queueing game {}..{} ({} bytes)",
                            record.start_time,
                            record.end_time,
                            record.payload.len()
                        );
                        worker.submit(record);
                    }
                }
            }
            Err(e) => warn!("Failed to read {}: {}", tailer.path().display(), e),
        }

        if shutdown.wait(config.poll_interval()) {
            break;
        }
    }

    worker.shutdown();
    info!("Recorded {} game(s) this session", recorded);
    println!("Shutdown complete.");
    Ok(())
}

/// Setup graceful shutdown handler with Ctrl+C
fn setup_shutdown_handler() -> Result<Arc<ShutdownSignal>> {
    let shutdown = Arc::new(ShutdownSignal::new());

    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        shutdown_ctrlc.trigger();
    })?;

    Ok(shutdown)
}
