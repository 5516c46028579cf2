//! Core formatting traits and the plain text implementation

use crate::{
    error::{AppError, Result},
    models::ProbeOutcome,
    stats::SelectionSummary,
};
use std::fmt::Write as _;

/// Renders selection results for the terminal
pub trait OutputFormatter {
    /// Banner shown above the ranking
    fn format_header(&self, title: &str) -> Result<String>;

    /// Ranking table of the first `rows` outcomes
    fn format_ranking(&self, outcomes: &[ProbeOutcome], rows: usize) -> Result<String>;

    /// Run totals
    fn format_summary(&self, summary: &SelectionSummary) -> Result<String>;

    /// Advisory message line
    fn format_warning(&self, warning: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Show the packet column and error details
    pub verbose_mode: bool,
    pub table_borders: bool,
    /// Host cells longer than this are truncated
    pub max_host_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_host_width: 48,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

fn write_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Columns of the ranking table
    pub(super) fn ranking_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("#", Alignment::Right, 1, 4),
                Column::new("Host", Alignment::Left, 12, self.options.max_host_width),
                Column::new("Avg (ms)", Alignment::Right, 8, 10),
                Column::new("Success", Alignment::Right, 7, 7),
                Column::new("Packets", Alignment::Center, 7, 13),
                Column::new("Status", Alignment::Left, 6, 11),
            ],
            show_borders: self.options.table_borders,
            show_header: true,
        }
    }

    /// Table cells for the first `rows` outcomes
    pub(super) fn ranking_rows(&self, outcomes: &[ProbeOutcome], rows: usize) -> Vec<RowData> {
        outcomes
            .iter()
            .take(rows)
            .enumerate()
            .map(|(idx, outcome)| {
                let stats = &outcome.statistics;
                let success = if outcome.success { stats.success_percent() } else { 0 };
                vec![
                    (idx + 1).to_string(),
                    outcome.host.address.clone(),
                    stats.avg_ms().to_string(),
                    format!("{}%", success),
                    format!("({}/{})", stats.packets_received, stats.packets_sent),
                    outcome.status().label().to_string(),
                ]
            })
            .collect()
    }

    pub(super) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output.trim_end().to_string()
    }

    pub(super) fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(col_idx, column)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);

                content
                    .max(column.min_width)
                    .max(column.header.len())
                    .min(column.max_width.max(column.header.len()))
            })
            .collect()
    }

    pub(super) fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let cells: Vec<String> = data
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(idx, (cell, &width))| {
                let alignment = format.columns.get(idx).map_or(Alignment::Left, |c| c.alignment);
                self.align_text(cell, width, alignment)
            })
            .collect();

        self.join_cells(&cells, format.show_borders)
    }

    /// Join already padded cells with the table separators
    pub(super) fn join_cells(&self, cells: &[String], show_borders: bool) -> String {
        if show_borders {
            format!("| {} |", cells.join(" | "))
        } else {
            cells.join("  ").trim_end().to_string()
        }
    }

    pub(super) fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    pub(super) fn align_text(&self, text: &str, width: usize, alignment: Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.chars().take(width).collect();
        }

        let padding = width - len;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left_pad = padding / 2;
                let right_pad = padding - left_pad;
                format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
            }
        }
    }

    pub(super) fn format_duration(&self, duration_ms: f64) -> String {
        if duration_ms < 1.0 {
            format!("{:.0}us", duration_ms * 1000.0)
        } else if duration_ms < 1000.0 {
            format!("{:.1}ms", duration_ms)
        } else if duration_ms < 60000.0 {
            format!("{:.2}s", duration_ms / 1000.0)
        } else {
            let minutes = (duration_ms / 60000.0) as u32;
            let seconds = (duration_ms % 60000.0) / 1000.0;
            format!("{}m{:.1}s", minutes, seconds)
        }
    }

    pub(super) fn format_percentage(&self, percentage: f64) -> String {
        format!("{:.1}%", percentage.clamp(0.0, 100.0))
    }

    /// Failure reasons of the listed failed outcomes, one per line
    pub(super) fn failure_details(&self, outcomes: &[ProbeOutcome], rows: usize) -> Vec<String> {
        outcomes
            .iter()
            .take(rows)
            .filter_map(|o| o.error.as_ref())
            .map(|e| e.to_string())
            .collect()
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(write_err)?;
        writeln!(output, "  {}  ", title).map_err(write_err)?;
        write!(output, "{}", border).map_err(write_err)?;

        Ok(output)
    }

    fn format_ranking(&self, outcomes: &[ProbeOutcome], rows: usize) -> Result<String> {
        if outcomes.is_empty() {
            return Ok("No hosts were probed.".to_string());
        }

        let mut output = self.create_table(&self.ranking_format(), &self.ranking_rows(outcomes, rows));

        if self.options.verbose_mode {
            for detail in self.failure_details(outcomes, rows) {
                write!(output, "\n  ! {}", detail).map_err(write_err)?;
            }
        }

        Ok(output)
    }

    fn format_summary(&self, summary: &SelectionSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Selection Summary:").map_err(write_err)?;
        writeln!(output, "------------------").map_err(write_err)?;
        writeln!(
            output,
            "Total Duration:   {}",
            self.format_duration(summary.elapsed.as_secs_f64() * 1000.0)
        )
        .map_err(write_err)?;
        writeln!(output, "Hosts Probed:     {}", summary.total).map_err(write_err)?;
        writeln!(
            output,
            "Responding:       {} ({})",
            summary.successful,
            self.format_percentage(summary.success_rate)
        )
        .map_err(write_err)?;
        writeln!(output, "Unavailable:      {}", summary.unavailable).map_err(write_err)?;
        write!(output, "Timed Out:        {}", summary.timeouts).map_err(write_err)?;

        if let (Some(host), Some(avg)) = (&summary.fastest, summary.fastest_avg) {
            write!(
                output,
                "\nFastest:          {} ({})",
                host,
                self.format_duration(avg.as_secs_f64() * 1000.0)
            )
            .map_err(write_err)?;
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }
}
