//! Colored formatter implementation with terminal color support

use super::formatter::{fmt_error, summary_rows, FormattingOptions, OutputFormatter, BANNER_TITLE};
use crate::{
    error::Result,
    models::{ProbeResult, Summary},
    types::ProbeOutcome,
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    /// Color for a probe outcome
    pub fn outcome_color(&self, outcome: ProbeOutcome) -> Color {
        match outcome {
            ProbeOutcome::Success => self.success,
            ProbeOutcome::Timeout => self.warning,
            ProbeOutcome::HttpError | ProbeOutcome::TransportError => self.error,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_banner(&self) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", self.bold(BANNER_TITLE)).map_err(fmt_error)?;
        write!(
            output,
            "{}",
            self.colorize(&format!("Version {}", crate::VERSION), self.color_scheme.muted)
        )
        .map_err(fmt_error)?;
        Ok(output)
    }

    fn format_start(&self, target_url: &str, time_limit_seconds: Option<f64>) -> Result<String> {
        let mut output = format!("Benchmarking {}", self.colorize(target_url, self.color_scheme.info));
        if let Some(limit) = time_limit_seconds {
            write!(output, " for {} seconds", limit).map_err(fmt_error)?;
        }
        output.push_str(" (please wait)...");
        Ok(output)
    }

    fn format_probe_result(&self, result: &ProbeResult) -> Result<String> {
        let color = self.color_scheme.outcome_color(result.outcome());
        Ok(format!(
            " Request# {} returned HTTP {} with {} bytes in {:.*} secs",
            result.sequence,
            self.colorize(&result.status.to_string(), color),
            result.bytes,
            self.options.precision,
            result.duration.as_secs_f64()
        ))
    }

    fn format_completed(&self) -> Result<String> {
        Ok(format!("\n{}\n", self.colorize("Completed!", self.color_scheme.success)))
    }

    fn format_summary(&self, summary: &Summary) -> Result<String> {
        let mut output = format!("{}\n", self.emphasize("SUMMARY", self.color_scheme.header));

        for row in summary_rows(summary, self.options.precision) {
            if row.group_start {
                output.push('\n');
            }

            let label = format!("{:<22}", format!("{}:", row.label));
            let value = match row.label {
                "Failed requests" if summary.failed > 0 => self.colorize(&row.value, self.color_scheme.error),
                "Requests per second" => self.bold(&row.value),
                _ => row.value.normal(),
            };
            writeln!(output, " {}{}", label, value).map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("Warning:", self.color_scheme.warning), warning))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("Error:", self.color_scheme.error), error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PlainFormatter;
    use std::time::Duration;

    fn result(status: u16) -> ProbeResult {
        ProbeResult {
            sequence: 1,
            status,
            bytes: 10,
            duration: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_outcome_colors() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.outcome_color(ProbeOutcome::Success), Color::Green);
        assert_eq!(scheme.outcome_color(ProbeOutcome::Timeout), Color::Yellow);
        assert_eq!(scheme.outcome_color(ProbeOutcome::TransportError), Color::Red);
        assert_eq!(scheme.outcome_color(ProbeOutcome::HttpError), Color::Red);
    }

    #[test]
    fn test_colors_disabled_matches_plain_probe_line() {
        let options = FormattingOptions::default();
        let colored = ColoredFormatter::new(options.clone());
        let plain = PlainFormatter::new(options);

        for status in [200, 404, 408, 0] {
            assert_eq!(
                colored.format_probe_result(&result(status)).unwrap(),
                plain.format_probe_result(&result(status)).unwrap()
            );
        }
    }

    #[test]
    fn test_colored_status_contains_ansi() {
        colored::control::set_override(true);
        let formatter = ColoredFormatter::new(FormattingOptions {
            enable_color: true,
            precision: 3,
        });

        let line = formatter.format_probe_result(&result(503)).unwrap();
        assert!(line.contains("\x1b["));
        assert!(line.contains("503"));
    }
}
