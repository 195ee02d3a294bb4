//! Output formatting and display system
//!
//! Formatters render the run preamble, the per-cycle report lines, and the
//! closing summary, with or without terminal colors. The console reporter
//! bridges the trial runner's cycle events to the selected formatter.

mod colored;
mod formatter;

pub use colored::ColoredFormatter;
pub use formatter::{FormattingOptions, OutputFormatter, PlainFormatter};

use crate::{
    models::{CycleReport, ProbeConfig},
    resolver::ResolvedAddress,
    runner::CycleObserver,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Prints run events to stdout as they happen
///
/// In quiet mode (JSON output) nothing is printed during the run; the
/// caller emits the collected report at the end instead.
pub struct ConsoleReporter {
    formatter: Box<dyn OutputFormatter>,
    config: ProbeConfig,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(formatter: Box<dyn OutputFormatter>, config: ProbeConfig, quiet: bool) -> Self {
        Self {
            formatter,
            config,
            quiet,
        }
    }

    /// Borrow the underlying formatter, for rendering the final summary
    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }
}

impl CycleObserver for ConsoleReporter {
    fn on_resolved(&mut self, resolved: &ResolvedAddress) {
        if self.quiet {
            return;
        }
        match self.formatter.format_preamble(resolved, &self.config) {
            Ok(line) => println!("\n{}\n", line),
            Err(err) => eprintln!("{}", err),
        }
    }

    fn on_cycle(&mut self, report: &CycleReport) {
        if self.quiet {
            return;
        }
        match self.formatter.format_cycle(report) {
            Ok(line) => println!("{}", line),
            Err(err) => eprintln!("{}", err),
        }
    }
}
