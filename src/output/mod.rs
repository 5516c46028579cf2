//! Output formatting and display system
//!
//! Renders a ranked selection either as a table (colored or plain) or as a
//! JSON document for scripts.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter, PerformanceLevel};
pub use formatter::{Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};

use crate::{
    error::{AppError, Result},
    models::{Config, ProbeOutcome},
    stats::SelectionSummary,
};
use serde::Serialize;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..Default::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Plain text formatter for scripts and logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// JSON document printed with `--json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    hosts: &'a [ProbeOutcome],
    summary: &'a SelectionSummary,
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    rows: usize,
    json: bool,
    verbose: bool,
}

impl OutputCoordinator {
    /// Coordinator printing `rows` table rows with `formatter`
    pub fn new(formatter: Box<dyn OutputFormatter>, rows: usize) -> Self {
        Self {
            formatter,
            rows,
            json: false,
            verbose: false,
        }
    }

    /// Coordinator set up from the run configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::create_formatter(config.enable_color && !config.json, config.verbose),
            rows: config.output,
            json: config.json,
            verbose: config.verbose,
        }
    }

    /// Render the ranked outcomes of one run
    pub fn display_selection(&self, ranked: &[ProbeOutcome], summary: &SelectionSummary) -> Result<String> {
        if self.json {
            return self.display_json(ranked, summary);
        }

        let mut output = String::new();

        if self.verbose {
            output.push_str(&self.formatter.format_header("Host Selection Results")?);
            output.push_str("\n\n");
        }

        output.push_str(&self.formatter.format_ranking(ranked, self.rows)?);

        if self.verbose {
            output.push_str("\n\n");
            output.push_str(&self.formatter.format_summary(summary)?);
        }

        Ok(output)
    }

    /// Top `rows` outcomes and the run summary as pretty-printed JSON
    pub fn display_json(&self, ranked: &[ProbeOutcome], summary: &SelectionSummary) -> Result<String> {
        let report = JsonReport {
            hosts: &ranked[..ranked.len().min(self.rows)],
            summary,
        };
        serde_json::to_string_pretty(&report).map_err(|e| AppError::internal(format!("Failed to encode JSON output: {}", e)))
    }

    /// Advisory line for stderr
    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }
}
