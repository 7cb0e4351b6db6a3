//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::{ENV_CONCURRENCY, ENV_ENABLE_COLOR, ENV_REQUESTS, ENV_TIME_LIMIT, ENV_TIMEOUT};
use std::path::Path;

/// Default location of the optional dotenv file
pub const ENV_FILE: &str = ".env";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(ENV_FILE), debug)
    }

    /// Load a dotenv file if it exists. Variables already present in the
    /// process environment are left untouched.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Example .env content listing every supported variable
    pub fn create_example_env_content() -> String {
        let mut content = String::from(
            "# HTTP Benchmarker Configuration\n\
             #\n\
             # Values here act as defaults. Environment variables set in the shell\n\
             # take precedence, and command-line flags override both.\n\n",
        );

        for (var, description, example) in Self::get_supported_env_vars() {
            content.push_str(&format!("# {}\n# {}={}\n\n", description, var, example));
        }

        content.push_str(
            "# Sustained load for one minute with 50 concurrent requests:\n\
             # HBENCH_CONCURRENCY=50\n\
             # HBENCH_TIME_LIMIT_SECONDS=60\n",
        );
        content
    }

    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate a variable's format before it is merged into the config
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ENV_REQUESTS | ENV_CONCURRENCY => {
                let count: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if count == 0 {
                    return Err(AppError::config(format!("{} must be greater than 0", key)));
                }
            }
            ENV_TIMEOUT => {
                let timeout: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !timeout.is_finite() || timeout <= 0.0 {
                    return Err(AppError::config(format!("{} must be a positive number, got: {}", key, value)));
                }
            }
            ENV_TIME_LIMIT => {
                let limit: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !limit.is_finite() || limit < 0.0 {
                    return Err(AppError::config(format!("{} must be zero or positive, got: {}", key, value)));
                }
            }
            ENV_ENABLE_COLOR => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (ENV_REQUESTS, "Number of requests to perform", "1000"),
            (ENV_CONCURRENCY, "Number of requests kept in flight", "10"),
            (ENV_TIMEOUT, "Per-request timeout in seconds", "30"),
            (ENV_TIME_LIMIT, "Benchmark time limit in seconds (0 disables)", "0"),
            (ENV_ENABLE_COLOR, "Enable colored output", "true"),
        ]
    }

    pub fn display_env_help() -> String {
        let mut help = String::from("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<26} {}\n", var, description));
            help.push_str(&format!("  {:<26} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");
        help
    }

    /// Validate the supported variables currently set in the process
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var, _, _)| {
                let value = std::env::var(var).ok()?;
                Self::validate_env_var(var, &value).err().map(|e| format!("Warning: {}", e))
            })
            .collect()
    }

    /// Validate the entries of a dotenv file without loading it.
    /// Returns `None` when the file does not exist.
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let warnings = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                Self::validate_env_var(key.trim(), value)
                    .err()
                    .map(|e| format!("Line '{}': {}", line, e))
            })
            .collect();

        Ok(Some(warnings))
    }
}
