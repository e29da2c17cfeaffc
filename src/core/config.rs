//! Environment-driven configuration.
//!
//! Every knob has a default so the daemon runs with no environment at all;
//! `.env` loading happens in the binary before this is read.

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

/// Runtime configuration for the daemon
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the key-value records live in
    pub data_dir: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Seconds between reminder sweeps
    pub poll_interval_secs: u64,
    /// Seconds between display-clock refreshes
    pub clock_refresh_secs: u64,
}

impl Config {
    /// Build configuration from environment variables, with defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_dir: env::var("CHIME_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            log_level: env::var("CHIME_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            poll_interval_secs: env_u64("CHIME_POLL_INTERVAL_SECS", 10)?,
            clock_refresh_secs: env_u64("CHIME_CLOCK_REFRESH_SECS", 60)?,
        })
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn clock_period(&self) -> Duration {
        Duration::from_secs(self.clock_refresh_secs)
    }
}

/// Read an integer variable, falling back to `default` when unset.
fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {name} ({raw:?}): {e}")),
        Err(_) => Ok(default),
    }
}
