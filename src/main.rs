//! skillpath - Main Entry Point

use clap::Parser;
use std::process::ExitCode;

use skillpath::cli::{self, Cli};
use skillpath::config::AppConfig;
use skillpath::logger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    cli::apply_overrides(&cli, &mut config);

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    logger::init_logging(level);

    match cli::run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
