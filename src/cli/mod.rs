//! Command-line interface definition

pub mod help;

pub use help::HelpSystem;

use clap::Parser;

/// HTTP Benchmarker - measure how many GET requests per second a server sustains
#[derive(Parser, Debug, Clone)]
#[command(name = "hbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Absolute http(s) URL to benchmark
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Number of requests to perform
    #[arg(short = 'n', long)]
    pub requests: Option<u64>,

    /// Number of requests kept in flight at once
    #[arg(short = 'c', long)]
    pub concurrency: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(short = 's', long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Maximum seconds to spend benchmarking; implies -n 50000
    #[arg(short = 't', long = "timelimit", value_name = "SECONDS")]
    pub time_limit: Option<f64>,

    /// Print the summary as a JSON object
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for a specific topic (env, examples, output)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.help_topic.is_some() {
            return Ok(());
        }

        match self.url.as_deref().map(str::trim) {
            None | Some("") => return Err("Missing target URL".to_string()),
            Some(_) => {}
        }

        if let Some(timeout) = self.timeout {
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err(format!("Invalid timeout: {}", timeout));
            }
        }

        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(format!("Invalid time limit: {}", limit));
            }
        }

        Ok(())
    }

    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Help text for `--help-topic`, falling back to the usage text
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!(
                    "Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                    topic,
                    HelpSystem::TOPICS.join(", "),
                    help_system.usage(use_colors)
                )
            }),
            None => help_system.usage(use_colors),
        }
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
