//! Run configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// IP address family requested for resolution and probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpFamily {
    /// 32-bit IPv4 addressing
    V4,
    /// 128-bit IPv6 addressing
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

impl std::str::FromStr for IpFamily {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "4" | "v4" | "ipv4" | "IPv4" => Ok(IpFamily::V4),
            "6" | "v6" | "ipv6" | "IPv6" => Ok(IpFamily::V6),
            other => Err(AppError::parse(format!(
                "Invalid IP family '{}': expected 4 or 6",
                other
            ))),
        }
    }
}

/// Policy applied when a probe attempt fails within a cycle
///
/// Either way the failed attempt marks the whole cycle absent; the policy
/// decides whether the remaining cycles still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Record the cycle as absent and continue with the next cycle
    #[default]
    MarkAbsent,
    /// Stop the run after the first absent cycle
    Abort,
}

/// Immutable run configuration for a probe session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Host name or address to probe
    #[serde(default = "default_host")]
    pub host: String,

    /// Address family used for resolution and probing
    #[serde(default = "default_family")]
    pub family: IpFamily,

    /// Ports probed each cycle, in order (1-8 entries)
    #[serde(default = "default_ports")]
    pub ports: Vec<u16>,

    /// Per-attempt connect timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of trial cycles
    #[serde(default = "default_cycles")]
    pub cycles: u32,

    /// Connect attempts per port within one cycle
    #[serde(default = "default_ops_per_cycle")]
    pub ops_per_cycle: u32,

    /// Behavior after a failed attempt
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Emit the run report as JSON instead of formatted text
    #[serde(default)]
    pub json: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            family: default_family(),
            ports: default_ports(),
            timeout_ms: default_timeout_ms(),
            cycles: default_cycles(),
            ops_per_cycle: default_ops_per_cycle(),
            failure_policy: FailurePolicy::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            json: false,
        }
    }
}

impl ProbeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the per-attempt timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Total connect attempts in one cycle
    pub fn ops_per_port_set(&self) -> u32 {
        self.ops_per_cycle * self.ports.len() as u32
    }

    /// Total connect attempts over the whole run
    pub fn total_ops(&self) -> u32 {
        self.cycles * self.ops_per_port_set()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::config("Host cannot be empty"));
        }

        if self.ports.is_empty() {
            return Err(AppError::config("At least one port is required"));
        }

        if self.ports.len() > crate::defaults::MAX_PORTS {
            return Err(AppError::config(format!(
                "Too many ports: {} given, at most {} allowed",
                self.ports.len(),
                crate::defaults::MAX_PORTS
            )));
        }

        // u16 already bounds the upper range; port 0 is not probeable
        if self.ports.iter().any(|&p| p == 0) {
            return Err(AppError::config("Port 0 is not a valid probe target"));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_ms > 300_000 {
            return Err(AppError::config("Timeout cannot exceed 300000 ms"));
        }

        if self.cycles == 0 {
            return Err(AppError::config("Cycle count must be greater than 0"));
        }

        if self.cycles > 100 {
            return Err(AppError::config("Cycle count cannot exceed 100"));
        }

        if self.ops_per_cycle == 0 {
            return Err(AppError::config("Ops per cycle must be greater than 0"));
        }

        if self.ops_per_cycle > 100 {
            return Err(AppError::config("Ops per cycle cannot exceed 100"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("PROBE_HOST") {
            if !host.trim().is_empty() {
                self.host = host.trim().to_string();
            }
        }

        if let Ok(ports) = std::env::var("PROBE_PORTS") {
            self.ports = crate::cli::parse_ports(&ports)?;
        }

        if let Ok(family) = std::env::var("PROBE_IP_FAMILY") {
            self.family = family.parse()?;
        }

        if let Ok(cycles) = std::env::var("PROBE_CYCLES") {
            self.cycles = cycles.parse().map_err(|e| {
                AppError::config(format!("Invalid PROBE_CYCLES value '{}': {}", cycles, e))
            })?;
        }

        if let Ok(ops) = std::env::var("PROBE_OPS_PER_CYCLE") {
            self.ops_per_cycle = ops.parse().map_err(|e| {
                AppError::config(format!("Invalid PROBE_OPS_PER_CYCLE value '{}': {}", ops, e))
            })?;
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT_MS") {
            self.timeout_ms = timeout.parse().map_err(|e| {
                AppError::config(format!("Invalid PROBE_TIMEOUT_MS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_host() -> String {
    crate::defaults::DEFAULT_HOST.to_string()
}

fn default_family() -> IpFamily {
    IpFamily::V4
}

fn default_ports() -> Vec<u16> {
    crate::defaults::DEFAULT_PORTS.to_vec()
}

fn default_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_cycles() -> u32 {
    crate::defaults::DEFAULT_CYCLES
}

fn default_ops_per_cycle() -> u32 {
    crate::defaults::DEFAULT_OPS_PER_CYCLE
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
