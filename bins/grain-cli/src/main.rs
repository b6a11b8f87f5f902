//! grain-cli: run a Grain harvest over JSON inputs.
//!
//! Reads a cred history and an earnings snapshot, computes one harvest with
//! the FAST or FAIR policy, and prints the versioned harvest as JSON on
//! stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;

use commands::HarvestArgs;
use config::Config;

/// Grain allocation command-line interface.
#[derive(Parser)]
#[command(name = "grain-cli")]
#[command(version, about = "Allocate grain in proportion to cred.")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides GRAIN_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json"). Overrides GRAIN_LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Decimal places for logged amounts. Overrides GRAIN_DISPLAY_DECIMALS.
    #[arg(long, global = true)]
    decimals: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one harvest and print it as JSON.
    Harvest(HarvestArgs),
    /// Render a raw grain amount as a decimal.
    Format {
        /// Raw amount (10^-18 grain units).
        #[arg(allow_hyphen_values = true)]
        raw: i128,
        /// Decimal places to keep.
        #[arg(long)]
        places: Option<u32>,
    },
}

impl Cli {
    /// Merge CLI overrides onto the environment configuration.
    fn into_config(self) -> Result<(Config, Commands)> {
        let mut config = Config::from_env().context("Failed to load configuration")?;
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(decimals) = self.decimals {
            config.display_decimals = decimals;
        }
        Ok((config, self.command))
    }
}

fn main() -> Result<()> {
    let (config, command) = Cli::parse().into_config()?;
    init_logging(&config.log_level, &config.log_format);

    match command {
        Commands::Harvest(args) => {
            let harvest = commands::run_harvest(&args, config.display_decimals)?;
            println!("{}", serde_json::to_string_pretty(&harvest)?);
        }
        Commands::Format { raw, places } => {
            println!("{}", commands::run_format(raw, places.unwrap_or(config.display_decimals)));
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Both write to stderr.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
