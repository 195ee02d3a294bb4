//! Zero Packet Probe - Main CLI Application
//!
//! Checks whether a host accepts TCP connections on a set of ports, measures
//! the handshake latency, and reports aggregate timing statistics over
//! repeated trial cycles.

use clap::Parser;
use std::process;
use zero_packet_probe::{
    cli::Cli,
    config::{display_config_summary, load_config},
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    output::{ConsoleReporter, OutputFormatterFactory},
    resolver::AddressResolver,
    runner::TrialRunner,
    PKG_NAME, VERSION,
};

// Probes run strictly one at a time, so the runtime stays single-threaded.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();
    let use_colors = cli.use_colors();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_colors));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let config = load_config(cli)?;

    let min_level = if config.debug {
        LogLevel::Debug
    } else if config.verbose {
        LogLevel::Info
    } else {
        LogLevel::Warn
    };
    let logger = Logger::new(min_level, config.enable_color, false);

    if config.debug {
        logger.debug(format!(
            "{} v{} (built {}, commit {})",
            PKG_NAME,
            VERSION,
            env!("BUILD_TIME"),
            env!("GIT_COMMIT")
        ));
        for line in display_config_summary(&config).lines() {
            logger.debug(line);
        }
    }

    // Initialize core components
    let resolver = AddressResolver::from_system_conf()?;
    let mut runner = TrialRunner::new(&config, resolver);

    // Ctrl-C stops the run before its next pending attempt
    let cancel = runner.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    let mut reporter = ConsoleReporter::new(formatter, config.clone(), config.json);

    logger.info(format!(
        "Probing {} on {} port(s), {} cycle(s)",
        config.host,
        config.ports.len(),
        config.cycles
    ));

    // Execute the run; an Absent verdict is still a normal completion
    let report = runner.run(&mut reporter).await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", reporter.formatter().format_summary(&report.summary)?);
    }

    logger.info(format!(
        "Run complete: verdict {}, {} cycle(s), {} absent",
        report.summary.verdict,
        report.cycles.len(),
        report.cycles.iter().filter(|c| !c.reachable()).count()
    ));

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Ports are a comma-separated list of up to 8 values, e.g. -p 80,443");
            eprintln!("  - Timeout is in milliseconds and must be greater than 0");
            eprintln!("  - Cycle and op counts must be greater than 0");
        }
        AppError::UnknownHost { .. } => {
            eprintln!();
            eprintln!("Resolution help:");
            eprintln!("  - Check that the host name is spelled correctly");
            eprintln!("  - The host may have no address of the requested family; try -4 or -6");
            eprintln!("  - Test resolution manually with 'nslookup' or 'dig'");
        }
        AppError::UnsupportedFamily { .. } => {
            eprintln!();
            eprintln!("Resolution help:");
            eprintln!("  - The requested address family is not available on this system");
            eprintln!("  - Try the other family flag (-4 or -6)");
        }
        _ => {}
    }
}
