//! Colored formatter implementation with terminal color support

use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter, RowData};
use crate::{
    error::{AppError, Result},
    models::ProbeOutcome,
    stats::SelectionSummary,
    types::ProbeStatus,
};
use colored::*;
use std::fmt::Write as _;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    Excellent, // < 30ms
    Good,      // 30-100ms
    Fair,      // 100-250ms
    Poor,      // >= 250ms
}

impl PerformanceLevel {
    /// Classify an average round-trip time in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 30.0 {
            Self::Excellent
        } else if latency_ms < 100.0 {
            Self::Good
        } else if latency_ms < 250.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
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
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
///
/// Shares the table layout of [`PlainFormatter`]; cells are padded first and
/// colored afterwards so escape codes never count towards column widths.
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

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

    /// Bold text in `color`, or the bare text when colors are off
    fn emphasize(&self, text: &str, color: Color) -> String {
        if self.options.enable_color {
            text.bold().color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn status_color(&self, status: ProbeStatus) -> Color {
        match status {
            ProbeStatus::Success => self.color_scheme.success,
            ProbeStatus::Timeout => self.color_scheme.warning,
            ProbeStatus::Unavailable => self.color_scheme.error,
        }
    }

    fn percentage_color(&self, percentage: u32) -> Color {
        if percentage >= 95 {
            self.color_scheme.success
        } else if percentage >= 80 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        }
    }

    /// Color one padded cell of a ranking row
    fn color_cell(&self, column: usize, cell: &str, outcome: &ProbeOutcome) -> String {
        let status = outcome.status();
        match column {
            1 if status == ProbeStatus::Success => self.bold(cell).to_string(),
            1 => self.colorize(cell, self.color_scheme.muted).to_string(),
            2 if status == ProbeStatus::Success => {
                let level = PerformanceLevel::from_latency(outcome.avg_rtt().as_secs_f64() * 1000.0);
                self.colorize(cell, level.color()).to_string()
            }
            2 => self.colorize(cell, self.color_scheme.muted).to_string(),
            3 if status == ProbeStatus::Success => self
                .colorize(cell, self.percentage_color(outcome.statistics.success_percent()))
                .to_string(),
            3 => self.colorize(cell, self.color_scheme.error).to_string(),
            5 => self.colorize(cell, self.status_color(status)).to_string(),
            _ => cell.to_string(),
        }
    }

    fn create_colored_table(&self, outcomes: &[ProbeOutcome], rows: usize) -> String {
        let format = self.plain_formatter.ranking_format();
        let data: Vec<RowData> = self.plain_formatter.ranking_rows(outcomes, rows);
        if data.is_empty() {
            return String::new();
        }

        let widths = self.plain_formatter.calculate_column_widths(&format, &data);
        let border = self
            .colorize(&self.plain_formatter.create_horizontal_border(&widths), self.color_scheme.border)
            .to_string();

        let header_cells: Vec<String> = format
            .columns
            .iter()
            .zip(widths.iter())
            .map(|(column, &width)| {
                let padded = self.plain_formatter.align_text(&column.header, width, column.alignment);
                self.emphasize(&padded, self.color_scheme.header)
            })
            .collect();

        let mut lines = Vec::with_capacity(data.len() + 4);
        if format.show_borders {
            lines.push(border.clone());
        }
        lines.push(self.plain_formatter.join_cells(&header_cells, format.show_borders));
        if format.show_borders {
            lines.push(border.clone());
        }

        for (row, outcome) in data.iter().zip(outcomes.iter()) {
            let cells: Vec<String> = row
                .iter()
                .zip(format.columns.iter().zip(widths.iter()))
                .enumerate()
                .map(|(idx, (cell, (column, &width)))| {
                    let padded = self.plain_formatter.align_text(cell, width, column.alignment);
                    self.color_cell(idx, &padded, outcome)
                })
                .collect();
            lines.push(self.plain_formatter.join_cells(&cells, format.show_borders));
        }

        if format.show_borders {
            lines.push(border);
        }

        lines.join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", self.emphasize(title, self.color_scheme.header))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_ranking(&self, outcomes: &[ProbeOutcome], rows: usize) -> Result<String> {
        if outcomes.is_empty() {
            return Ok(self.colorize("No hosts were probed.", self.color_scheme.muted).to_string());
        }

        let mut output = self.create_colored_table(outcomes, rows);

        if self.options.verbose_mode {
            for detail in self.plain_formatter.failure_details(outcomes, rows) {
                write!(output, "\n  {} {}", self.colorize("!", self.color_scheme.error), detail)
                    .map_err(|e| AppError::io(format!("Failed to format ranking: {}", e)))?;
            }
        }

        Ok(output)
    }

    fn format_summary(&self, summary: &SelectionSummary) -> Result<String> {
        let mut output = String::new();
        let err = |e: std::fmt::Error| AppError::io(format!("Failed to format summary: {}", e));

        writeln!(output, "{}", self.emphasize("Selection Summary", self.color_scheme.header)).map_err(err)?;

        let duration = self
            .plain_formatter
            .format_duration(summary.elapsed.as_secs_f64() * 1000.0);
        let rate_color = self.percentage_color(summary.success_rate.round() as u32);

        writeln!(output, "  Duration:     {}", self.colorize(&duration, self.color_scheme.info)).map_err(err)?;
        writeln!(output, "  Hosts:        {}", summary.total).map_err(err)?;
        writeln!(
            output,
            "  Responding:   {} ({})",
            self.colorize(&summary.successful.to_string(), self.color_scheme.success),
            self.colorize(&self.plain_formatter.format_percentage(summary.success_rate), rate_color)
        )
        .map_err(err)?;

        if summary.failed > 0 {
            writeln!(
                output,
                "  Failed:       {} ({} unavailable, {} timed out)",
                self.colorize(&summary.failed.to_string(), self.color_scheme.error),
                summary.unavailable,
                summary.timeouts
            )
            .map_err(err)?;
        }

        match (&summary.fastest, summary.fastest_avg) {
            (Some(host), Some(avg)) => {
                let avg_ms = avg.as_secs_f64() * 1000.0;
                let level = PerformanceLevel::from_latency(avg_ms);
                write!(
                    output,
                    "  Fastest:      {} ({}, {})",
                    self.bold(host),
                    self.colorize(&self.plain_formatter.format_duration(avg_ms), level.color()),
                    level.description()
                )
                .map_err(err)?;
            }
            _ => {
                write!(output, "  {}", self.colorize("No host responded", self.color_scheme.error)).map_err(err)?;
            }
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("WARNING:", self.color_scheme.warning), warning))
    }
}
