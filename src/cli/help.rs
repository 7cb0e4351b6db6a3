//! Usage text and topic help

use crate::config::env::EnvManager;
use colored::*;

/// Usage text and topic help for the CLI
pub struct HelpSystem {
    binary: &'static str,
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpSystem {
    /// Topics accepted by `--help-topic`
    pub const TOPICS: [&'static str; 3] = ["env", "examples", "output"];

    pub fn new() -> Self {
        Self { binary: "hbench" }
    }

    /// Short usage text, printed after configuration errors
    pub fn usage(&self, use_colors: bool) -> String {
        let mut help = String::new();

        let heading = |text: &str| {
            if use_colors {
                text.bold().to_string()
            } else {
                text.to_string()
            }
        };

        help.push_str(&format!("{} {} [OPTIONS] <URL>\n\n", heading("Usage:"), self.binary));
        help.push_str(&format!("{}\n", heading("Options:")));

        let options = [
            ("-n, --requests <N>", "Number of requests to perform (default 1)"),
            ("-c, --concurrency <N>", "Number of requests kept in flight (default 1)"),
            ("-s, --timeout <SECONDS>", "Per-request timeout (default 30)"),
            ("-t, --timelimit <SECONDS>", "Maximum time to spend benchmarking; implies -n 50000"),
            ("    --json", "Print the summary as JSON"),
            ("    --no-color", "Disable colored output"),
            ("    --verbose", "Enable verbose output"),
            ("    --debug", "Enable debug output"),
            ("    --help-topic <TOPIC>", "Show help for: env, examples, output"),
            ("-h, --help", "Print help"),
        ];

        for (flag, description) in options {
            let flag = if use_colors {
                flag.green().to_string()
            } else {
                flag.to_string()
            };
            help.push_str(&format!("  {:<28} {}\n", flag, description));
        }

        help
    }

    /// Help for a single topic, `None` for unknown topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "env" | "environment" | "config" => Some(self.format_environment_help(use_colors)),
            "examples" => Some(self.format_examples(use_colors)),
            "output" => Some(self.format_output_help(use_colors)),
            _ => None,
        }
    }

    fn format_title(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            format!("{}\n\n", title.bold().cyan())
        } else {
            format!("{}\n\n", title)
        }
    }

    fn format_environment_help(&self, use_colors: bool) -> String {
        let mut help = self.format_title("Environment Configuration", use_colors);
        help.push_str(&EnvManager::display_env_help());
        help.push_str("\nVariables may also be placed in a .env file in the working directory.\n");
        help
    }

    fn format_examples(&self, use_colors: bool) -> String {
        let mut help = self.format_title("Examples", use_colors);

        let examples = [
            ("Single request", format!("{} http://localhost:8080/", self.binary)),
            ("1000 requests, 10 at a time", format!("{} -n 1000 -c 10 http://localhost:8080/", self.binary)),
            ("Sustained load for 30 seconds", format!("{} -c 50 -t 30 https://example.com/", self.binary)),
            ("Two second timeout, JSON summary", format!("{} -n 200 -c 20 -s 2 --json http://127.0.0.1/api", self.binary)),
        ];

        for (description, command) in examples {
            help.push_str(&format!("  # {}\n", description));
            if use_colors {
                help.push_str(&format!("  {}\n\n", command.green()));
            } else {
                help.push_str(&format!("  {}\n\n", command));
            }
        }

        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = self.format_title("Output", use_colors);
        help.push_str(
            "Each finished request prints one line with its sequence number, HTTP\n\
             status, body size and duration. Status 0 means no response was\n\
             received; status 408 means the request took at least the timeout.\n\n\
             The summary reports completed and failed requests, bytes transferred,\n\
             requests per second, mean time per request and transfer rate. Rates\n\
             that cannot be computed are shown as n/a.\n\n\
             With --json stdout carries only the summary as one JSON object;\n\
             per-request lines and log messages go to stderr.\n",
        );
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_every_flag() {
        let usage = HelpSystem::new().usage(false);
        for flag in ["--requests", "--concurrency", "--timeout", "--timelimit", "--json"] {
            assert!(usage.contains(flag), "missing {}", flag);
        }
        assert!(usage.starts_with("Usage: hbench [OPTIONS] <URL>"));
    }

    #[test]
    fn test_topics() {
        let help = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            assert!(help.display_topic_help(topic, false).is_some(), "{}", topic);
        }
        assert!(help.display_topic_help("EXAMPLES", false).is_some());
        assert!(help.display_topic_help("tls", false).is_none());
    }

    #[test]
    fn test_output_topic_mentions_status_codes() {
        let text = HelpSystem::new().display_topic_help("output", false).unwrap();
        assert!(text.contains("Status 0"));
        assert!(text.contains("408"));
    }
}
