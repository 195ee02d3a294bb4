//! Trial orchestration: repeated probe cycles over the configured ports

use crate::{
    error::Result,
    models::{CycleReport, FailurePolicy, ProbeConfig, RunReport, TimingTable},
    probe::ConnectProbe,
    resolver::{AddressResolver, ResolvedAddress},
    stats::StatsAggregator,
};
use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, nothing attempted yet
    Idle,
    /// Resolving the target host
    Resolving,
    /// Executing probe cycles
    Probing,
    /// All cycles ran (absent cycles included)
    Completed,
    /// Resolution failed; no cycle was attempted
    Failed,
}

/// Receiver for per-cycle report events
///
/// `on_cycle` fires as each cycle completes, before the next one starts.
pub trait CycleObserver {
    /// Called once after resolution succeeds, before the first cycle
    fn on_resolved(&mut self, _resolved: &ResolvedAddress) {}

    /// Called as each cycle completes
    fn on_cycle(&mut self, report: &CycleReport);
}

/// Observer that discards all events
pub struct NullObserver;

impl CycleObserver for NullObserver {
    fn on_cycle(&mut self, _report: &CycleReport) {}
}

/// Outcome of one cycle's attempt loop
enum CycleRun {
    /// Cycle ran to completion; `None` means the cycle is absent
    Done(Option<f64>),
    /// Cancellation was requested before the next pending attempt
    Interrupted,
}

/// Runs the configured trial cycles sequentially against one target
///
/// The target address is resolved exactly once and cached for every probe of
/// the run. Probes never overlap; each one is awaited before the next starts,
/// so the per-handshake timings stay undistorted.
pub struct TrialRunner<'a> {
    config: &'a ProbeConfig,
    resolver: AddressResolver,
    state: RunState,
    resolved: Option<ResolvedAddress>,
    cancel: CancellationToken,
}

impl<'a> TrialRunner<'a> {
    /// Create an idle runner for the given configuration
    pub fn new(config: &'a ProbeConfig, resolver: AddressResolver) -> Self {
        Self {
            config,
            resolver,
            state: RunState::Idle,
            resolved: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The cached target address, once resolution has succeeded
    pub fn resolved(&self) -> Option<&ResolvedAddress> {
        self.resolved.as_ref()
    }

    /// Token that stops the run before its next pending attempt
    ///
    /// An attempt already in flight finishes under its own timeout; nothing
    /// is aborted mid-handshake.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute the full run and summarize it
    ///
    /// Resolution failure aborts immediately with no cycles attempted; probe
    /// failures never do. The run completes even when every cycle is absent.
    pub async fn run(&mut self, observer: &mut dyn CycleObserver) -> Result<RunReport> {
        self.state = RunState::Resolving;
        let resolved = match self
            .resolver
            .resolve(&self.config.host, self.config.family)
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                self.state = RunState::Failed;
                return Err(err);
            }
        };
        self.resolved = Some(resolved.clone());
        observer.on_resolved(&resolved);

        self.state = RunState::Probing;
        let probe = ConnectProbe::new(self.config.timeout());
        let ops_per_cycle_total = self.config.ops_per_port_set();

        let started_at = Utc::now();
        let run_start = Instant::now();

        let mut table = TimingTable::with_capacity(self.config.cycles as usize);
        let mut cycles = Vec::with_capacity(self.config.cycles as usize);

        for cycle in 1..=self.config.cycles {
            if self.cancel.is_cancelled() {
                break;
            }

            match self.run_cycle(&probe, &resolved).await {
                CycleRun::Done(cycle_ms) => {
                    table.record(cycle_ms);

                    let report = CycleReport {
                        cycle,
                        host_display: resolved.host_display.clone(),
                        addr_display: resolved.addr_display.clone(),
                        ops: ops_per_cycle_total,
                        elapsed_ms: cycle_ms,
                        timestamp: Utc::now(),
                    };
                    observer.on_cycle(&report);
                    let absent = cycle_ms.is_none();
                    cycles.push(report);

                    if absent && self.config.failure_policy == FailurePolicy::Abort {
                        break;
                    }
                }
                // Interrupted cycles are not recorded; the summary covers
                // completed cycles only.
                CycleRun::Interrupted => break,
            }
        }

        let total_elapsed = run_start.elapsed();
        self.state = RunState::Completed;

        let total_ops = cycles.len() as u32 * ops_per_cycle_total;
        let summary = StatsAggregator::summarize(&table, total_elapsed, total_ops, &resolved);

        Ok(RunReport {
            cycles,
            summary,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Run every attempt of one cycle and aggregate its time
    ///
    /// The first failed attempt marks the whole cycle absent and skips its
    /// remaining attempts; there is no partial credit within a cycle.
    async fn run_cycle(&self, probe: &ConnectProbe, resolved: &ResolvedAddress) -> CycleRun {
        let attempts = self.config.ops_per_port_set();
        let mut total = Duration::ZERO;

        for _op in 0..self.config.ops_per_cycle {
            for &port in &self.config.ports {
                if self.cancel.is_cancelled() {
                    return CycleRun::Interrupted;
                }

                let outcome = probe.probe(resolved, port).await;
                match outcome.elapsed {
                    Some(elapsed) => total += elapsed,
                    None => return CycleRun::Done(None),
                }
            }
        }

        let mean_ms = total.as_secs_f64() * 1000.0 / attempts as f64;
        CycleRun::Done(Some(mean_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IpFamily, Verdict};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Observer that collects every event for assertions
    #[derive(Default)]
    struct Collector {
        resolved: Option<ResolvedAddress>,
        cycles: Vec<CycleReport>,
    }

    impl CycleObserver for Collector {
        fn on_resolved(&mut self, resolved: &ResolvedAddress) {
            self.resolved = Some(resolved.clone());
        }

        fn on_cycle(&mut self, report: &CycleReport) {
            self.cycles.push(report.clone());
        }
    }

    async fn local_listener() -> (u16, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });
        (port, handle)
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    fn config_for(port: u16, cycles: u32, ops: u32) -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.host = "127.0.0.1".to_string();
        config.ports = vec![port];
        config.cycles = cycles;
        config.ops_per_cycle = ops;
        config.timeout_ms = 500;
        config
    }

    #[tokio::test]
    async fn test_reachable_run_reports_every_cycle() {
        let (port, server) = local_listener().await;
        let config = config_for(port, 3, 2);
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);
        assert_eq!(runner.state(), RunState::Idle);

        let mut collector = Collector::default();
        let report = runner.run(&mut collector).await.unwrap();

        assert_eq!(runner.state(), RunState::Completed);
        assert!(collector.resolved.is_some());
        assert_eq!(report.cycles.len(), 3);
        for (i, cycle) in report.cycles.iter().enumerate() {
            assert_eq!(cycle.cycle as usize, i + 1);
            assert_eq!(cycle.ops, 2);
            assert!(cycle.reachable());
            assert!(cycle.elapsed_ms.unwrap() >= 0.0);
        }

        let summary = &report.summary;
        assert_eq!(summary.verdict, Verdict::Active);
        assert!(summary.min_ms <= summary.avg_ms);
        assert!(summary.avg_ms <= summary.max_ms);
        assert_eq!(summary.total_ops, 6);

        // Observer saw the same cycles, in order
        assert_eq!(collector.cycles.len(), 3);

        server.abort();
    }

    #[tokio::test]
    async fn test_closed_port_yields_absent_summary() {
        let port = closed_port().await;
        let config = config_for(port, 1, 1);
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        let report = runner.run(&mut NullObserver).await.unwrap();

        assert_eq!(runner.state(), RunState::Completed);
        assert_eq!(report.cycles.len(), 1);
        assert!(!report.cycles[0].reachable());
        assert_eq!(report.summary.verdict, Verdict::Absent);
    }

    #[tokio::test]
    async fn test_absent_cycles_continue_by_default() {
        let port = closed_port().await;
        let config = config_for(port, 3, 1);
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        let report = runner.run(&mut NullObserver).await.unwrap();

        // Every cycle still ran, each marked absent
        assert_eq!(report.cycles.len(), 3);
        assert!(report.cycles.iter().all(|c| !c.reachable()));
        assert_eq!(report.summary.verdict, Verdict::Absent);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_after_first_absent_cycle() {
        let port = closed_port().await;
        let mut config = config_for(port, 3, 1);
        config.failure_policy = FailurePolicy::Abort;
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        let report = runner.run(&mut NullObserver).await.unwrap();

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.summary.verdict, Verdict::Absent);
    }

    #[tokio::test]
    async fn test_resolution_failure_aborts_with_no_cycles() {
        // IPv4 literal under an IPv6 request can never resolve
        let mut config = config_for(80, 2, 1);
        config.family = IpFamily::V6;
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        let mut collector = Collector::default();
        let err = runner.run(&mut collector).await.unwrap_err();

        assert_eq!(runner.state(), RunState::Failed);
        assert_eq!(err.exit_code(), 2);
        assert!(collector.resolved.is_none());
        assert!(collector.cycles.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_records_no_cycles() {
        let (port, server) = local_listener().await;
        let config = config_for(port, 5, 2);
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        runner.cancellation_token().cancel();
        let report = runner.run(&mut NullObserver).await.unwrap();

        assert_eq!(runner.state(), RunState::Completed);
        assert!(report.cycles.is_empty());
        assert_eq!(report.summary.verdict, Verdict::Absent);
        assert_eq!(report.summary.total_ops, 0);

        server.abort();
    }

    #[tokio::test]
    async fn test_mixed_ports_mark_cycle_absent() {
        // One listening port, one closed port: no partial credit
        let (open, server) = local_listener().await;
        let closed = closed_port().await;
        let mut config = config_for(open, 2, 1);
        config.ports = vec![open, closed];
        let resolver = AddressResolver::from_system_conf().unwrap();
        let mut runner = TrialRunner::new(&config, resolver);

        let report = runner.run(&mut NullObserver).await.unwrap();

        assert_eq!(report.cycles.len(), 2);
        assert!(report.cycles.iter().all(|c| !c.reachable()));
        assert_eq!(report.summary.verdict, Verdict::Absent);

        server.abort();
    }
}
