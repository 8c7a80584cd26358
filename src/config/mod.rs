//! Configuration management for the coordinator
//!
//! Crate-level defaults for batch runs, loaded once at first use and
//! overridable per coordinator instance.

use crate::utils::error::{CoordinatorError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable overriding the fan-out width
pub const CONCURRENCY_ENV: &str = "BATCHOPS_CONCURRENCY";
/// Environment variable overriding the settle-to-reset delay, in milliseconds
pub const UPDATE_DELAY_ENV: &str = "BATCHOPS_UPDATE_DELAY_MS";

fn default_concurrency() -> usize {
    3
}

fn default_update_delay_ms() -> u64 {
    1000
}

/// Crate-level coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// How many per-item dispatches may be inflight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// How long a settled run stays visible before resetting, in milliseconds
    #[serde(default = "default_update_delay_ms")]
    pub update_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            update_delay_ms: default_update_delay_ms(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var(CONCURRENCY_ENV) {
            settings.concurrency = raw.parse().map_err(|e| {
                CoordinatorError::config(format!("invalid {}: {}", CONCURRENCY_ENV, e))
            })?;
        }

        if let Ok(raw) = std::env::var(UPDATE_DELAY_ENV) {
            settings.update_delay_ms = raw.parse().map_err(|e| {
                CoordinatorError::config(format!("invalid {}: {}", UPDATE_DELAY_ENV, e))
            })?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(CoordinatorError::config("concurrency must be at least 1"));
        }
        Ok(())
    }

    /// The settle-to-reset delay as a `Duration`
    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(|| match Settings::from_env() {
    Ok(settings) => {
        debug!(?settings, "coordinator settings loaded");
        settings
    }
    Err(e) => {
        warn!("falling back to default settings: {}", e);
        Settings::default()
    }
});

/// Crate-level settings, read once at first use
pub fn settings() -> &'static Settings {
    &SETTINGS
}
