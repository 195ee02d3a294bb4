//! Data models and structures for the zero packet probe

pub mod config;
pub mod report;

// Re-export main model types
pub use config::{FailurePolicy, IpFamily, ProbeConfig};
pub use report::{
    CycleReport, FailureKind, ProbeOutcome, RunReport, SummaryStats, TimingTable, Verdict,
};
