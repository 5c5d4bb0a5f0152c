//! Configuration for bisection runs.
//!
//! # Environment
//!
//! - `FIDDLE_BISECT_TIMEOUT_SECS`: per-candidate run timeout for the command
//!   oracle. Default 300 seconds; `0` disables the timeout.
//! - `FIDDLE_BISECT_COMPARE_URL`: base of the "commits between versions" link
//!   printed when an autobisect completes.

use std::time::Duration;

use thiserror::Error;

/// Default per-candidate run timeout (5 minutes).
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// Default base for compare links.
pub const DEFAULT_COMPARE_URL: &str = "https://github.com/electron/electron/compare";

const TIMEOUT_ENV: &str = "FIDDLE_BISECT_TIMEOUT_SECS";
const COMPARE_URL_ENV: &str = "FIDDLE_BISECT_COMPARE_URL";

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Configuration shared by the autobisect driver and the command oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisectConfig {
    /// Maximum wall time for a single candidate run.
    ///
    /// `None` waits indefinitely. A run that exceeds it is `Invalid`.
    pub run_timeout: Option<Duration>,

    /// Base URL for compare links, without a trailing slash.
    pub compare_url: String,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BisectConfig {
    /// Creates a new `BisectConfig` with default values.
    pub fn new() -> Self {
        BisectConfig {
            run_timeout: Some(Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS)),
            compare_url: DEFAULT_COMPARE_URL.to_string(),
        }
    }

    /// Creates a `BisectConfig` from environment variables, rejecting
    /// malformed values. Unset variables keep their defaults.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
            config = config.with_timeout_secs(secs);
        }

        if let Some(url) = lookup(COMPARE_URL_ENV)
            && !url.trim().is_empty()
        {
            config = config.with_compare_url(url);
        }

        Ok(config)
    }

    /// Sets the run timeout in seconds; `0` disables it.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.run_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Sets the compare URL base.
    pub fn with_compare_url(mut self, url: impl Into<String>) -> Self {
        self.compare_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
