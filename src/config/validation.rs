//! Advisory configuration checks
//!
//! Hard errors live in [`Config::validate`]. The checks here only produce
//! warnings that are printed before the run starts.

use crate::{defaults, error::Result, models::Config};
use colored::Colorize;
use std::net::IpAddr;

/// Concurrency above which file descriptor exhaustion becomes likely
pub const HIGH_CONCURRENCY: u64 = 1000;

/// Configuration validator producing advisory warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run the hard validation, then collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::check_target(config)?);
        warnings.extend(Self::check_load_settings(config));
        Ok(warnings)
    }

    fn check_target(config: &Config) -> Result<Vec<ValidationWarning>> {
        let target = config.target()?;
        let mut warnings = Vec::new();

        let is_local = target.host.eq_ignore_ascii_case("localhost")
            || target.host.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false);
        if is_local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Target {} is on this machine; client and server will compete for CPU",
                    target.host
                ),
            ));
        }

        if target.as_url()?.query().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Target URL includes query parameters, responses may be cached".to_string(),
            ));
        }

        Ok(warnings)
    }

    fn check_load_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.concurrency > HIGH_CONCURRENCY {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Concurrency of {} may exhaust open file limits on client or server",
                    config.concurrency
                ),
            ));
        }

        if let Some(limit) = config.time_limit() {
            if config.timeout() > limit {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Timeout of {}s is longer than the {}s time limit; the run may overshoot the limit",
                        config.timeout_seconds, config.time_limit_seconds
                    ),
                ));
            }

            if config.requests == defaults::TIME_LIMIT_REQUEST_CAP {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!(
                        "Time limit set; request count raised to {}",
                        defaults::TIME_LIMIT_REQUEST_CAP
                    ),
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }

    /// Terminal color name for this level
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "blue",
            Self::Warning => "yellow",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
