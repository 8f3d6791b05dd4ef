mod cli;
mod commands;
mod shutdown;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (info unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hearthrec=info,hearthrec_core=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = args.load_config()?;

    match args.command {
        Some(Command::Watch {
            log_config,
            from_start,
        }) => commands::watch::run(&config, log_config.as_deref(), from_start),
        Some(Command::Replay) => commands::replay::run(&config),
        Some(Command::Configure { log_config }) => {
            commands::configure::run(&config, log_config.as_deref())
        }
        Some(Command::Inspect { file }) => commands::inspect::run(&file),
        Some(Command::List) => commands::list::run(&config),
        None => commands::watch::run(&config, None, false),
    }
}
