//! Command-line interface

use crate::error::{AppError, Result};
use crate::models::IpFamily;
use clap::Parser;

/// Zero Packet Probe - measures TCP handshake latency without sending a payload
#[derive(Parser, Debug, Clone)]
#[command(name = "zpp")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Host name or address to probe
    #[arg(default_value_t = crate::defaults::DEFAULT_HOST.to_string())]
    pub host: String,

    /// Probe IPv4 addresses (the default)
    #[arg(short = '4', long = "ipv4")]
    pub ipv4: bool,

    /// Probe IPv6 addresses
    #[arg(short = '6', long = "ipv6", conflicts_with = "ipv4")]
    pub ipv6: bool,

    /// Ports to probe, comma-separated (at most 8)
    #[arg(short, long, value_name = "LIST")]
    pub ports: Option<String>,

    /// Number of trial cycles
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_CYCLES)]
    pub count: u32,

    /// Connect attempts per port within one cycle
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_OPS_PER_CYCLE)]
    pub ops: u32,

    /// Per-attempt connect timeout in milliseconds
    #[arg(short, long, value_parser = parse_timeout, default_value_t = crate::defaults::DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout: u64,

    /// Stop the run after the first absent cycle
    #[arg(long)]
    pub fail_fast: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Emit the run report as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<()> {
        if self.color && self.no_color {
            return Err(AppError::validation(
                "Cannot specify both --color and --no-color",
            ));
        }

        if self.json && self.verbose {
            return Err(AppError::validation(
                "--json output does not combine with --verbose",
            ));
        }

        if let Some(ref ports) = self.ports {
            parse_ports(ports)?;
        }

        Ok(())
    }

    /// Requested address family
    pub fn family(&self) -> IpFamily {
        if self.ipv6 {
            IpFamily::V6
        } else {
            IpFamily::V4
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse a comma-separated port list
///
/// At most eight entries, each in 1..=65535.
pub fn parse_ports(list: &str) -> Result<Vec<u16>> {
    let mut ports = Vec::new();

    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(AppError::parse(format!("Empty entry in port list '{}'", list)));
        }

        let port: u16 = part
            .parse()
            .map_err(|_| AppError::parse(format!("Invalid port: {}", part)))?;
        if port == 0 {
            return Err(AppError::parse("Port 0 is not a valid probe target"));
        }
        ports.push(port);
    }

    if ports.is_empty() {
        return Err(AppError::parse("Port list cannot be empty"));
    }

    if ports.len() > crate::defaults::MAX_PORTS {
        return Err(AppError::parse(format!(
            "Too many ports: {} given, at most {} allowed",
            ports.len(),
            crate::defaults::MAX_PORTS
        )));
    }

    Ok(ports)
}

/// Parse timeout from a milliseconds string
fn parse_timeout(s: &str) -> std::result::Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|ms| {
            if ms == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if ms > 300_000 {
                Err("Timeout cannot exceed 300000 ms".to_string())
            } else {
                Ok(ms)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
