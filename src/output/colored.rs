//! Colored report formatting

use crate::{
    error::{AppError, Result},
    models::{CycleReport, ProbeConfig, SummaryStats},
    output::formatter::{
        cycle_prefix, preamble_line, summary_header, summary_stats_line, summary_totals,
        FormattingOptions, OutputFormatter,
    },
    resolver::ResolvedAddress,
};
use colored::Colorize;
use std::fmt::Write;

/// Formatter with ANSI color styling for interactive terminals
pub struct ColoredFormatter {
    options: FormattingOptions,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_preamble(&self, resolved: &ResolvedAddress, config: &ProbeConfig) -> Result<String> {
        Ok(preamble_line(resolved, config).bold().to_string())
    }

    fn format_cycle(&self, report: &CycleReport) -> Result<String> {
        let mut line = cycle_prefix(report);
        match report.elapsed_ms {
            Some(ms) => {
                write!(
                    line,
                    "{} time = {} ms",
                    "Active".green(),
                    format!("{:.3}", ms).cyan()
                )
                .map_err(|e| AppError::io(format!("Failed to format cycle: {}", e)))?;
            }
            None => {
                write!(line, "{}", "Absent".red().bold())
                    .map_err(|e| AppError::io(format!("Failed to format cycle: {}", e)))?;
            }
        }

        if self.options.verbose_mode {
            write!(
                line,
                "  [{}]",
                report.timestamp.format("%H:%M:%S%.3f").to_string().dimmed()
            )
            .map_err(|e| AppError::io(format!("Failed to format cycle: {}", e)))?;
        }

        Ok(line)
    }

    fn format_summary(&self, summary: &SummaryStats) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", summary_header(summary).bold())
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "{}", summary_totals(summary))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        if summary.is_active() {
            writeln!(output, "{}", summary_stats_line(summary).cyan())
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        } else {
            writeln!(
                output,
                "{}",
                "host absent, no timing statistics available".red()
            )
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }

        Ok(output)
    }
}
