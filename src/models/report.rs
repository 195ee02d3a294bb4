//! Probe outcome and report data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Classification of a failed connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The attempt succeeded
    None,
    /// The timeout elapsed before the handshake completed
    Timeout,
    /// The remote actively refused the connection
    Refused,
    /// No route to the host or network
    Unreachable,
    /// The local stack cannot open sockets of this family
    UnsupportedFamily,
    /// Any other connect failure
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::None => "none",
            FailureKind::Timeout => "timeout",
            FailureKind::Refused => "refused",
            FailureKind::Unreachable => "unreachable",
            FailureKind::UnsupportedFamily => "unsupported family",
            FailureKind::Unknown => "unknown error",
        };
        write!(f, "{}", name)
    }
}

/// Result of a single connect attempt
///
/// Failure is an expected, frequent result here, so it is carried as a value
/// rather than an error; the caller decides what a failed attempt means for
/// the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Handshake time, present only for reachable attempts
    pub elapsed: Option<Duration>,
    /// Failure classification, `None` for reachable attempts
    pub failure: FailureKind,
}

impl ProbeOutcome {
    /// Create a successful outcome
    pub fn reachable(elapsed: Duration) -> Self {
        Self {
            elapsed: Some(elapsed),
            failure: FailureKind::None,
        }
    }

    /// Create a failed outcome with the given classification
    pub fn failed(failure: FailureKind) -> Self {
        debug_assert!(failure != FailureKind::None);
        Self {
            elapsed: None,
            failure,
        }
    }

    /// Whether the connect attempt completed a handshake
    pub fn is_reachable(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Handshake time in milliseconds, if reachable
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.elapsed.map(|d| d.as_secs_f64() * 1000.0)
    }
}

/// Ordered per-cycle aggregate times for one run
///
/// Each entry is the mean handshake time of one cycle in milliseconds, or
/// `None` for an absent cycle. Built incrementally by the trial runner and
/// read-only once the run completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingTable {
    samples: Vec<Option<f64>>,
}

impl TimingTable {
    /// Create an empty table, pre-allocating for the expected cycle count
    pub fn with_capacity(cycles: usize) -> Self {
        Self {
            samples: Vec::with_capacity(cycles),
        }
    }

    /// Record one completed cycle; `None` marks the cycle absent
    pub fn record(&mut self, cycle_ms: Option<f64>) {
        self.samples.push(cycle_ms);
    }

    /// Number of recorded cycles
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no cycle has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All recorded entries in cycle order
    pub fn samples(&self) -> &[Option<f64>] {
        &self.samples
    }

    /// Times of the successful cycles, in cycle order
    pub fn successful(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|s| *s)
    }

    /// Number of absent cycles
    pub fn absent_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_none()).count()
    }
}

/// Per-cycle report event, emitted as each cycle completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle index
    pub cycle: u32,
    /// Host as given on the command line
    pub host_display: String,
    /// Resolved address in display form
    pub addr_display: String,
    /// Connect attempts belonging to this cycle
    pub ops: u32,
    /// Mean handshake time for the cycle, absent cycles carry no time
    pub elapsed_ms: Option<f64>,
    /// When the cycle completed
    pub timestamp: DateTime<Utc>,
}

impl CycleReport {
    /// Whether every attempt in the cycle succeeded
    pub fn reachable(&self) -> bool {
        self.elapsed_ms.is_some()
    }
}

/// Final reachability verdict for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// At least one cycle completed with all attempts reachable
    Active,
    /// No cycle could confirm the host; distinct from an error
    Absent,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Active => write!(f, "Active"),
            Verdict::Absent => write!(f, "Absent"),
        }
    }
}

/// Summary statistics over the successful cycles of a run
///
/// The numeric fields are meaningful only when `verdict` is
/// [`Verdict::Active`]; an absent run reports zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Final reachability verdict
    pub verdict: Verdict,
    /// Minimum cycle time in milliseconds
    pub min_ms: f64,
    /// Mean cycle time in milliseconds
    pub avg_ms: f64,
    /// Maximum cycle time in milliseconds
    pub max_ms: f64,
    /// Population standard deviation of cycle times in milliseconds
    pub stddev_ms: f64,
    /// Total connect attempts over the run
    pub total_ops: u32,
    /// Wall-clock duration of the whole run in milliseconds
    pub total_elapsed_ms: f64,
    /// Host as given on the command line
    pub host_display: String,
    /// Resolved address in display form
    pub addr_display: String,
}

impl SummaryStats {
    /// Whether the host was confirmed reachable in at least one cycle
    pub fn is_active(&self) -> bool {
        self.verdict == Verdict::Active
    }
}

/// Complete result of one probe run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-cycle reports in completion order
    pub cycles: Vec<CycleReport>,
    /// Aggregate statistics and verdict
    pub summary: SummaryStats,
    /// When the probing phase started
    pub started_at: DateTime<Utc>,
    /// When the run completed
    pub completed_at: DateTime<Utc>,
}
