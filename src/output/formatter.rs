//! Plain-text report formatting

use crate::{
    error::{AppError, Result},
    models::{CycleReport, ProbeConfig, SummaryStats},
    resolver::ResolvedAddress,
};
use std::fmt::Write;

/// Options shared by all formatters
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable ANSI colors
    pub enable_color: bool,
    /// Include extra detail (absent-cycle counts, timestamps)
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: false,
            verbose_mode: false,
        }
    }
}

/// Renders run events and summaries for the console
pub trait OutputFormatter: Send {
    /// One-line run header, shown before the first cycle
    fn format_preamble(&self, resolved: &ResolvedAddress, config: &ProbeConfig) -> Result<String>;

    /// One line per completed cycle
    fn format_cycle(&self, report: &CycleReport) -> Result<String>;

    /// Closing summary block
    fn format_summary(&self, summary: &SummaryStats) -> Result<String>;
}

/// Formatter without any terminal styling
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_preamble(&self, resolved: &ResolvedAddress, config: &ProbeConfig) -> Result<String> {
        Ok(preamble_line(resolved, config))
    }

    fn format_cycle(&self, report: &CycleReport) -> Result<String> {
        let mut line = cycle_prefix(report);
        match report.elapsed_ms {
            Some(ms) => {
                write!(line, "Active time = {:.3} ms", ms)
                    .map_err(|e| AppError::io(format!("Failed to format cycle: {}", e)))?;
            }
            None => line.push_str("Absent"),
        }

        if self.options.verbose_mode {
            write!(line, "  [{}]", report.timestamp.format("%H:%M:%S%.3f"))
                .map_err(|e| AppError::io(format!("Failed to format cycle: {}", e)))?;
        }

        Ok(line)
    }

    fn format_summary(&self, summary: &SummaryStats) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", summary_header(summary))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "{}", summary_totals(summary))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        if summary.is_active() {
            writeln!(output, "{}", summary_stats_line(summary))
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        } else {
            writeln!(output, "host absent, no timing statistics available")
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }

        Ok(output)
    }
}

/// `PROBE: host (addr): N ports used, M ops per cycle`
pub(super) fn preamble_line(resolved: &ResolvedAddress, config: &ProbeConfig) -> String {
    format!(
        "PROBE: {} ({}): {} ports used, {} ops per cycle",
        resolved.host_display,
        resolved.addr_display,
        config.ports.len(),
        config.ops_per_port_set()
    )
}

/// `#k  <ops> ops to host (addr): `
pub(super) fn cycle_prefix(report: &CycleReport) -> String {
    format!(
        "#{}  {} ops to {} ({}): ",
        report.cycle, report.ops, report.host_display, report.addr_display
    )
}

pub(super) fn summary_header(summary: &SummaryStats) -> String {
    format!(
        "--- probe summary for {}/{} ---",
        summary.host_display, summary.addr_display
    )
}

pub(super) fn summary_totals(summary: &SummaryStats) -> String {
    format!(
        "{} total ops used; total time: {:.3} ms",
        summary.total_ops, summary.total_elapsed_ms
    )
}

pub(super) fn summary_stats_line(summary: &SummaryStats) -> String {
    format!(
        "cycle-time min/avg/max/stddev = {:.3}/{:.3}/{:.3}/{:.3} ms",
        summary.min_ms, summary.avg_ms, summary.max_ms, summary.stddev_ms
    )
}
