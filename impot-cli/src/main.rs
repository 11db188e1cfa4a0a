use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use impot_cli::app::{self, Cli, Settings};
use impot_cli::config::Config;
use impot_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    logging::init_logging(level, config.log_file.as_deref())?;
    debug!(?config, "configuration loaded");

    let settings = Settings::resolve(&cli, &config)?;
    println!("{}", app::run(&cli.command, &settings));

    Ok(())
}
