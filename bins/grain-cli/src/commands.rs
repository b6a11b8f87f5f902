//! Subcommand implementations, kept free of process setup so they can be
//! driven from tests.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use grain_alloc::{fold_receipts, harvest};
use grain_core::{CredHistory, Earnings, Grain, Harvest, Strategy, StrategyKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Allocation policy: fast or fair.
    #[arg(short, long)]
    pub strategy: StrategyKind,

    /// Amount to distribute, as an exact decimal (e.g. 15 or 0.25).
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Grain,

    /// Strategy version to record (default: the version this build implements).
    #[arg(long)]
    pub strategy_version: Option<u32>,

    /// JSON file holding the cred history: [{"intervalEndMs": .., "cred": {..}}, ..].
    #[arg(long)]
    pub cred_history: PathBuf,

    /// JSON file mapping address to lifetime earnings (raw integer strings).
    #[arg(long)]
    pub earnings: Option<PathBuf>,

    /// Effective time of the harvest, in milliseconds since the epoch.
    #[arg(long)]
    pub timestamp_ms: u64,

    /// Write the earnings snapshot with this harvest's receipts folded in.
    #[arg(long)]
    pub earnings_out: Option<PathBuf>,
}

impl HarvestArgs {
    fn strategy(&self) -> Strategy {
        let version = self
            .strategy_version
            .unwrap_or_else(|| self.strategy.current_version());
        Strategy::new(self.strategy, version, self.amount)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Run one harvest and return it. Writes folded earnings if requested.
pub fn run_harvest(args: &HarvestArgs, display_decimals: u32) -> Result<Harvest> {
    let history: CredHistory = read_json(&args.cred_history)?;
    let earnings: Earnings = match &args.earnings {
        Some(path) => read_json(path)?,
        None => Earnings::new(),
    };

    let strategy = args.strategy();
    info!(
        strategy = %strategy.kind(),
        version = strategy.version(),
        amount = %strategy.amount().format(display_decimals),
        slices = history.len(),
        contributors = earnings.len(),
        "Running harvest"
    );

    let result = harvest(strategy, &history, &earnings, args.timestamp_ms)
        .context("Harvest failed")?;

    for receipt in &result.receipts {
        debug!(
            address = %receipt.address,
            amount = %receipt.amount.format(display_decimals),
            "receipt"
        );
    }
    info!(
        receipts = result.receipts.len(),
        total = %result.total()?.format(display_decimals),
        "Harvest complete"
    );

    if let Some(path) = &args.earnings_out {
        let next = fold_receipts(&earnings, &result.receipts)?;
        write_json(path, &next)?;
        info!(path = %path.display(), contributors = next.len(), "Wrote updated earnings");
    }

    Ok(result)
}

/// Render a raw grain value with `places` decimals.
pub fn run_format(raw: i128, places: u32) -> String {
    Grain::from_raw(raw).format(places)
}
