//! LTS Reduce

use clap::Parser;
use lts_reduce::{Config, Result, VERSION, cli, init_logging};
use std::process::ExitCode;

fn run(args: cli::Cli) -> Result<()> {
    // Logging is not up yet; messages from config loading are dropped.
    let config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level);

    tracing::info!("LTS Reduce v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    cli::execute(args, config)
}

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    // Printed directly: logging may not be up when config loading fails.
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_structural() => {
            eprintln!("error: the automaton cannot be reduced: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
