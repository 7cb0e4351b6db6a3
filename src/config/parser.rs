//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};
use std::path::{Path, PathBuf};

/// Combines defaults, the .env file, environment variables and CLI flags
/// into one validated [`Config`]
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(super::env::ENV_FILE),
        }
    }

    /// Read dotenv values from `path` instead of `./.env`
    pub fn with_env_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.env_file = path.as_ref().to_path_buf();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an explicit variable source, skipping
    /// the process environment and the .env file
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_vars(lookup)?;
        self.apply_cli_overrides(&mut config);

        // Counts are checked against what the user asked for, before the
        // time limit replaces the request count
        config.validate()?;
        if config.apply_time_limit_cap() && config.debug {
            eprintln!(
                "Time limit of {}s set; request count raised to {}",
                config.time_limit_seconds, config.requests
            );
        }

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.cli.url {
            config.target_url = url.trim().to_string();
        }
        if let Some(requests) = self.cli.requests {
            config.requests = requests;
        }
        if let Some(concurrency) = self.cli.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(time_limit) = self.cli.time_limit {
            config.time_limit_seconds = time_limit;
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only settings
        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for verbose and debug output
pub fn display_config_summary(config: &Config) -> String {
    let time_limit = match config.time_limit() {
        Some(_) => format!("{}s", config.time_limit_seconds),
        None => "none".to_string(),
    };

    [
        format!("Target URL: {}", config.target_url),
        format!("Requests: {}", config.requests),
        format!("Concurrency: {}", config.concurrency),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Time limit: {}", time_limit),
        format!("Color Output: {}", config.enable_color),
        format!("JSON Summary: {}", config.json_output),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}
