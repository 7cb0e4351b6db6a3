//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::HttpProbe,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, Result},
    executor::Dispatcher,
    log_debug, log_info, log_warn,
    logging::{Logger, LoggerFactory},
    models::{Config, Summary},
    output::{OutputFormatter, OutputFormatterFactory},
};
use std::sync::Arc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance, rejecting malformed arguments
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        if self.cli.should_show_topic_help() {
            println!("{}", self.cli.display_help());
            return Ok(());
        }

        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color);

        let factory = LoggerFactory::new(config.clone());
        let logger = Arc::new(factory.create_logger("hbench").await);

        if config.debug {
            eprintln!("Configuration Summary:\n{}\n", display_config_summary(&config));
        }
        log_debug!(logger, "Session {} starting", factory.session_id());

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        let result = self.benchmark(&config, &logger, formatter.as_ref()).await;
        if let Err(e) = &result {
            logger
                .error(&format!("Benchmark of {} aborted", config.target_url))
                .error_info(e)
                .log()
                .await;
        }
        result
    }

    async fn benchmark(&self, config: &Config, logger: &Arc<Logger>, formatter: &dyn OutputFormatter) -> Result<()> {
        let probe = HttpProbe::new(config)?.with_logger(Arc::clone(logger));
        let dispatcher = Dispatcher::from_config(Arc::new(probe), config)?.with_logger(Arc::clone(logger));

        let summary = if config.json_output {
            // stdout is reserved for the JSON document
            dispatcher
                .run_with(|result| match formatter.format_probe_result(result) {
                    Ok(line) => eprintln!("{}", line),
                    Err(e) => eprintln!("{}", e),
                })
                .await?
        } else {
            self.run_with_report(config, &dispatcher, formatter).await?
        };

        logger
            .info(&format!("Benchmark of {} finished", config.target_url))
            .summary(&summary)
            .log()
            .await;

        self.print_summary(config, &summary, formatter)?;

        if summary.completed > 0 && summary.failed == summary.completed {
            log_warn!(logger, "All {} requests failed", summary.completed);
        } else {
            log_info!(logger, "{} of {} requests failed", summary.failed, summary.completed);
        }

        Ok(())
    }

    /// Run while streaming the banner and one line per finished request
    async fn run_with_report(
        &self,
        config: &Config,
        dispatcher: &Dispatcher,
        formatter: &dyn OutputFormatter,
    ) -> Result<Summary> {
        println!();
        println!("{}", formatter.format_banner()?);
        println!();
        println!("{}", formatter.format_start(&config.target_url, config.time_limit().map(|_| config.time_limit_seconds))?);

        let summary = dispatcher
            .run_with(|result| match formatter.format_probe_result(result) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("{}", e),
            })
            .await?;

        println!("{}", formatter.format_completed()?);
        Ok(summary)
    }

    fn print_summary(&self, config: &Config, summary: &Summary, formatter: &dyn OutputFormatter) -> Result<()> {
        if config.json_output {
            println!("{}", formatter.format_json_summary(summary)?);
        } else {
            println!("{}", formatter.format_summary(summary)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_new_rejects_missing_url() {
        let error = App::new(Cli::parse_from(["hbench"])).err().unwrap();
        assert!(error.is_usage_error());
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_new_accepts_help_topic_without_url() {
        assert!(App::new(Cli::parse_from(["hbench", "--help-topic", "examples"])).is_ok());
    }

    #[tokio::test]
    async fn test_run_rejects_bad_counts_before_any_request() {
        let app = App::new(Cli::parse_from(["hbench", "-n", "2", "-c", "4", "http://127.0.0.1:9/"])).unwrap();
        let error = app.run().await.unwrap_err();
        assert!(error.is_usage_error());
    }
}
