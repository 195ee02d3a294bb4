//! Statistics aggregation over completed timing tables

use crate::{
    models::{SummaryStats, TimingTable, Verdict},
    resolver::ResolvedAddress,
};
use std::time::Duration;


/// Reduces a completed [`TimingTable`] into [`SummaryStats`]
///
/// Absent cycles are excluded from every numeric aggregate. A table with no
/// successful cycle yields the `Absent` verdict with zeroed numerics, so
/// callers must check the verdict before reading the numbers.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Summarize a run
    ///
    /// `total_elapsed` is the wall clock of the whole run, independent of the
    /// per-attempt timings; `total_ops` is the number of connect attempts
    /// the configuration called for.
    pub fn summarize(
        table: &TimingTable,
        total_elapsed: Duration,
        total_ops: u32,
        resolved: &ResolvedAddress,
    ) -> SummaryStats {
        let times: Vec<f64> = table.successful().collect();
        let total_elapsed_ms = total_elapsed.as_secs_f64() * 1000.0;

        if times.is_empty() {
            return SummaryStats {
                verdict: Verdict::Absent,
                min_ms: 0.0,
                avg_ms: 0.0,
                max_ms: 0.0,
                stddev_ms: 0.0,
                total_ops,
                total_elapsed_ms,
                host_display: resolved.host_display.clone(),
                addr_display: resolved.addr_display.clone(),
            };
        }

        let min_ms = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_ms = mean(&times);
        let stddev_ms = stddev(&times, avg_ms);

        SummaryStats {
            verdict: Verdict::Active,
            min_ms,
            avg_ms,
            max_ms,
            stddev_ms,
            total_ops,
            total_elapsed_ms,
            host_display: resolved.host_display.clone(),
            addr_display: resolved.addr_display.clone(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance: variability across the cycles that actually ran,
/// not a sample estimate.
fn variance(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}

fn stddev(values: &[f64], mean: f64) -> f64 {
    variance(values, mean).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> ResolvedAddress {
        ResolvedAddress {
            ip: "127.0.0.1".parse().unwrap(),
            host_display: "localhost".to_string(),
            addr_display: "127.0.0.1".to_string(),
        }
    }

    fn table_of(samples: &[Option<f64>]) -> TimingTable {
        let mut table = TimingTable::with_capacity(samples.len());
        for &s in samples {
            table.record(s);
        }
        table
    }

    #[test]
    fn test_all_absent_yields_absent_verdict() {
        let table = table_of(&[None, None, None]);
        let stats =
            StatsAggregator::summarize(&table, Duration::from_millis(1500), 12, &resolved());

        assert_eq!(stats.verdict, Verdict::Absent);
        assert!(!stats.is_active());
        assert_eq!(stats.min_ms, 0.0);
        assert_eq!(stats.avg_ms, 0.0);
        assert_eq!(stats.max_ms, 0.0);
        assert_eq!(stats.stddev_ms, 0.0);
        assert_eq!(stats.total_ops, 12);
    }

    #[test]
    fn test_empty_table_yields_absent_verdict() {
        let table = TimingTable::default();
        let stats = StatsAggregator::summarize(&table, Duration::ZERO, 0, &resolved());
        assert_eq!(stats.verdict, Verdict::Absent);
    }

    #[test]
    fn test_absent_cycles_are_excluded() {
        let table = table_of(&[Some(10.0), None, Some(20.0)]);
        let stats = StatsAggregator::summarize(&table, Duration::from_secs(1), 24, &resolved());

        assert_eq!(stats.verdict, Verdict::Active);
        assert_eq!(stats.min_ms, 10.0);
        assert_eq!(stats.max_ms, 20.0);
        assert_eq!(stats.avg_ms, 15.0);
        assert_eq!(stats.stddev_ms, 5.0);
    }

    #[test]
    fn test_single_cycle_has_zero_stddev() {
        let table = table_of(&[Some(42.5)]);
        let stats = StatsAggregator::summarize(&table, Duration::from_millis(50), 4, &resolved());

        assert_eq!(stats.verdict, Verdict::Active);
        assert_eq!(stats.min_ms, 42.5);
        assert_eq!(stats.avg_ms, 42.5);
        assert_eq!(stats.max_ms, 42.5);
        assert_eq!(stats.stddev_ms, 0.0);
    }

    #[test]
    fn test_population_stddev_formula() {
        // Known values: mean 4, squared diffs 4,0,4 => variance 8/3
        let table = table_of(&[Some(2.0), Some(4.0), Some(6.0)]);
        let stats = StatsAggregator::summarize(&table, Duration::from_secs(1), 12, &resolved());

        let expected = (8.0f64 / 3.0).sqrt();
        assert!((stats.stddev_ms - expected).abs() < 1e-12);
    }

    #[test]
    fn test_total_elapsed_is_wall_clock() {
        let table = table_of(&[Some(1.0)]);
        let stats =
            StatsAggregator::summarize(&table, Duration::from_millis(2500), 4, &resolved());
        assert!((stats.total_elapsed_ms - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_displays_carried_from_resolved_address() {
        let table = table_of(&[Some(1.0)]);
        let stats = StatsAggregator::summarize(&table, Duration::ZERO, 4, &resolved());
        assert_eq!(stats.host_display, "localhost");
        assert_eq!(stats.addr_display, "127.0.0.1");
    }
}
