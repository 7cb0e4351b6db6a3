//! Configuration data model and validation

use crate::defaults;
use crate::types::{AppError, Result, TargetInfo};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable names recognised by [`Config::merge_from_env`]
pub const ENV_REQUESTS: &str = "HBENCH_REQUESTS";
pub const ENV_CONCURRENCY: &str = "HBENCH_CONCURRENCY";
pub const ENV_TIMEOUT: &str = "HBENCH_TIMEOUT_SECONDS";
pub const ENV_TIME_LIMIT: &str = "HBENCH_TIME_LIMIT_SECONDS";
pub const ENV_ENABLE_COLOR: &str = "HBENCH_ENABLE_COLOR";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target URL to benchmark
    #[serde(default)]
    pub target_url: String,

    /// Total number of requests to perform
    #[serde(default = "default_requests")]
    pub requests: u64,

    /// Number of requests kept in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: f64,

    /// Overall time limit in seconds, 0 disables it
    #[serde(default)]
    pub time_limit_seconds: f64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print the summary as JSON
    #[serde(default)]
    pub json_output: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            requests: default_requests(),
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_secs(),
            time_limit_seconds: defaults::DEFAULT_TIME_LIMIT_SECS,
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for benchmarking `url` with otherwise default settings
    pub fn for_url<S: Into<String>>(url: S) -> Self {
        Self {
            target_url: url.into(),
            ..Self::default()
        }
    }

    /// Per-request timeout as Duration. Saturates for values [`validate`]
    /// would reject.
    ///
    /// [`validate`]: Config::validate
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::MAX)
    }

    /// Time limit as Duration, `None` when disabled
    pub fn time_limit(&self) -> Option<Duration> {
        if self.time_limit_seconds > 0.0 {
            Some(Duration::try_from_secs_f64(self.time_limit_seconds).unwrap_or(Duration::MAX))
        } else {
            None
        }
    }

    /// Parse the target URL
    pub fn target(&self) -> Result<TargetInfo> {
        TargetInfo::parse(&self.target_url)
    }

    /// Check the request count against concurrency. Runs before the time
    /// limit replaces the count with the cap.
    pub fn validate_counts(&self) -> Result<()> {
        if self.requests == 0 {
            return Err(AppError::validation("Request count must be greater than 0"));
        }

        if self.concurrency == 0 {
            return Err(AppError::validation("Concurrency must be greater than 0"));
        }

        if self.requests < self.concurrency {
            return Err(AppError::validation(format!(
                "Cannot use concurrency level {} greater than total number of requests {}",
                self.concurrency, self.requests
            )));
        }

        Ok(())
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        self.target()?;
        self.validate_counts()?;

        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(AppError::validation(format!(
                "Timeout must be a positive number of seconds, got: {}",
                self.timeout_seconds
            )));
        }

        if !self.time_limit_seconds.is_finite() || self.time_limit_seconds < 0.0 {
            return Err(AppError::validation(format!(
                "Time limit must be zero or a positive number of seconds, got: {}",
                self.time_limit_seconds
            )));
        }

        Duration::try_from_secs_f64(self.timeout_seconds)
            .map_err(|e| AppError::validation(format!("Timeout of {} seconds is out of range: {}", self.timeout_seconds, e)))?;
        Duration::try_from_secs_f64(self.time_limit_seconds).map_err(|e| {
            AppError::validation(format!("Time limit of {} seconds is out of range: {}", self.time_limit_seconds, e))
        })?;

        Ok(())
    }

    /// Replace the request count with the safety cap when a time limit is
    /// active. Returns whether the count was changed.
    pub fn apply_time_limit_cap(&mut self) -> bool {
        if self.time_limit().is_some() && self.requests != defaults::TIME_LIMIT_REQUEST_CAP {
            self.requests = defaults::TIME_LIMIT_REQUEST_CAP;
            true
        } else {
            false
        }
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|key| std::env::var(key).ok())
    }

    /// Merge settings from an arbitrary variable source
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(requests) = lookup(ENV_REQUESTS) {
            self.requests = requests.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_REQUESTS, requests, e)))?;
        }

        if let Some(concurrency) = lookup(ENV_CONCURRENCY) {
            self.concurrency = concurrency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_CONCURRENCY, concurrency, e)))?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_TIMEOUT, timeout, e)))?;
        }

        if let Some(time_limit) = lookup(ENV_TIME_LIMIT) {
            self.time_limit_seconds = time_limit.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_TIME_LIMIT, time_limit, e)))?;
        }

        if let Some(enable_color) = lookup(ENV_ENABLE_COLOR) {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_ENABLE_COLOR, enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_requests() -> u64 {
    defaults::DEFAULT_REQUESTS
}

fn default_concurrency() -> u64 {
    defaults::DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> f64 {
    defaults::DEFAULT_TIMEOUT_SECS
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
