//! Zero Packet Probe
//!
//! A zero-payload host-reachability probe: it checks whether a host accepts
//! TCP connections on a set of ports, measures the handshake latency, and
//! reports aggregate timing statistics over repeated trial cycles. No data
//! payload is ever sent; only the connect/close cost is measured.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod resolver;
pub mod runner;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{
    CycleReport, FailureKind, FailurePolicy, IpFamily, ProbeConfig, ProbeOutcome, RunReport,
    SummaryStats, TimingTable, Verdict,
};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use probe::ConnectProbe;
pub use resolver::{AddressResolver, ResolvedAddress};
pub use runner::{CycleObserver, RunState, TrialRunner};
pub use stats::StatsAggregator;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HOST: &str = "localhost";
    pub const DEFAULT_PORTS: &[u16] = &[80, 443];
    pub const DEFAULT_CYCLES: u32 = 4;
    pub const DEFAULT_OPS_PER_CYCLE: u32 = 4;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(4000);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Upper bound on the number of ports probed in one run
    pub const MAX_PORTS: usize = 8;
}
