//! CLI defaults loaded from environment variables.

use anyhow::{bail, Context, Result};

/// Runtime settings not tied to a single harvest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Log level filter string (e.g. "info", "debug", "grain_alloc=trace").
    pub log_level: String,
    /// Log output format, "text" or "json".
    pub log_format: String,
    /// Decimal places used when logging amounts.
    pub display_decimals: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            display_decimals: 3,
        }
    }
}

impl Config {
    /// Load configuration from `GRAIN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// [`Config::default`] for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("GRAIN_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = lookup("GRAIN_LOG_FORMAT").unwrap_or(defaults.log_format);
        if log_format != "text" && log_format != "json" {
            bail!("GRAIN_LOG_FORMAT must be \"text\" or \"json\", got {log_format:?}");
        }

        let display_decimals = match lookup("GRAIN_DISPLAY_DECIMALS") {
            Some(raw) => raw
                .parse()
                .context("GRAIN_DISPLAY_DECIMALS must be a non-negative integer")?,
            None => defaults.display_decimals,
        };

        Ok(Config {
            log_level,
            log_format,
            display_decimals,
        })
    }
}
