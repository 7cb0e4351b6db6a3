//! Output formatting for the benchmark report
//!
//! Per-request lines, the summary block and warnings are rendered through
//! [`OutputFormatter`], with a plain and a colored implementation.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{summary_rows, FormattingOptions, OutputFormatter, PlainFormatter, SummaryRow};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_plain_output_has_no_ansi() {
        let formatter = OutputFormatterFactory::create_plain_formatter();
        let warning = formatter.format_warning("slow target").unwrap();
        assert_eq!(warning, "Warning: slow target");
    }

    #[test]
    fn test_factory_both_variants_render_completion() {
        for enable_color in [true, false] {
            let formatter = OutputFormatterFactory::create_formatter(enable_color);
            assert!(formatter.format_completed().unwrap().contains("Completed!"));
        }
    }
}
