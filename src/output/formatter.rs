//! Core formatting trait and the plain text implementation

use crate::{
    error::{AppError, Result},
    models::{ProbeResult, Summary},
};
use std::fmt::Write as _;

/// Renders every piece of benchmark output
pub trait OutputFormatter: Send + Sync {
    /// Program banner printed before the run
    fn format_banner(&self) -> Result<String>;

    /// "Benchmarking ..." line
    fn format_start(&self, target_url: &str, time_limit_seconds: Option<f64>) -> Result<String>;

    /// One line per finished request
    fn format_probe_result(&self, result: &ProbeResult) -> Result<String>;

    /// Marker printed once every request has reported
    fn format_completed(&self) -> Result<String>;

    /// Text summary block
    fn format_summary(&self, summary: &Summary) -> Result<String>;

    /// Summary as a single JSON object
    fn format_json_summary(&self, summary: &Summary) -> Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;
}

/// Formatting options shared by all formatters
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Decimal places for seconds and rates
    pub precision: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: false,
            precision: 6,
        }
    }
}

/// One labelled line of the summary block
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
    /// Rows are grouped; a blank line precedes a new group
    pub group_start: bool,
}

impl SummaryRow {
    fn new(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            group_start: false,
        }
    }

    fn starting_group(mut self) -> Self {
        self.group_start = true;
        self
    }
}

pub(crate) fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Format an optional rate, `n/a` when undefined
pub(crate) fn format_rate(rate: Option<f64>, precision: usize) -> String {
    match rate {
        Some(value) => format!("{:.*}", precision, value),
        None => "n/a".to_string(),
    }
}

/// Label/value rows of the summary, shared by the plain and colored output
pub fn summary_rows(summary: &Summary, precision: usize) -> Vec<SummaryRow> {
    vec![
        SummaryRow::new("Server Hostname", summary.host.clone()),
        SummaryRow::new("Server Port", summary.port.to_string()),
        SummaryRow::new("Document Path", summary.document_path.clone()).starting_group(),
        SummaryRow::new("Document Length", format!("{} bytes", summary.document_length)),
        SummaryRow::new("Concurrency Level", summary.concurrency.to_string()).starting_group(),
        SummaryRow::new(
            "Time taken for tests",
            format!("{:.*} [sec]", precision, summary.total_duration.as_secs_f64()),
        ),
        SummaryRow::new("Completed requests", summary.completed.to_string()),
        SummaryRow::new("Failed requests", summary.failed.to_string()),
        SummaryRow::new("Total transferred", format!("{} bytes", summary.total_transferred)),
        SummaryRow::new(
            "Requests per second",
            format!("{} [#/sec] (mean)", format_rate(summary.requests_per_second, precision)),
        ),
        SummaryRow::new(
            "Time per request",
            format!(
                "{} [sec] (mean, across all concurrent requests)",
                format_rate(summary.time_per_request, precision)
            ),
        ),
        SummaryRow::new(
            "Transfer rate",
            format!("{} [bytes/sec] received", format_rate(summary.transfer_rate, precision)),
        ),
    ]
}

pub(crate) const BANNER_TITLE: &str = "This is HTTP Benchmarker, a simple HTTP server benchmarking tool";

/// Plain text formatter
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_banner(&self) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", BANNER_TITLE).map_err(fmt_error)?;
        write!(output, "Version {}", crate::VERSION).map_err(fmt_error)?;
        Ok(output)
    }

    fn format_start(&self, target_url: &str, time_limit_seconds: Option<f64>) -> Result<String> {
        let mut output = format!("Benchmarking {}", target_url);
        if let Some(limit) = time_limit_seconds {
            write!(output, " for {} seconds", limit).map_err(fmt_error)?;
        }
        output.push_str(" (please wait)...");
        Ok(output)
    }

    fn format_probe_result(&self, result: &ProbeResult) -> Result<String> {
        Ok(format!(
            " Request# {} returned HTTP {} with {} bytes in {:.*} secs",
            result.sequence,
            result.status,
            result.bytes,
            self.options.precision,
            result.duration.as_secs_f64()
        ))
    }

    fn format_completed(&self) -> Result<String> {
        Ok("\nCompleted!\n".to_string())
    }

    fn format_summary(&self, summary: &Summary) -> Result<String> {
        let mut output = String::from("SUMMARY\n");

        for row in summary_rows(summary, self.options.precision) {
            if row.group_start {
                output.push('\n');
            }
            writeln!(output, " {:<22}{}", format!("{}:", row.label), row.value).map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("Error: {}", error))
    }
}
