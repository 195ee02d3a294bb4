//! End-to-end probe runs through the library API
//!
//! These drive the full stack: CLI parsing, configuration loading, trial
//! orchestration against real loopback sockets, and summary aggregation.

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use zero_packet_probe::{
    cli::Cli,
    config::load_config,
    models::Verdict,
    resolver::AddressResolver,
    runner::{NullObserver, TrialRunner},
};

/// Loopback listener that accepts and immediately drops connections
async fn local_listener() -> Result<(u16, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    Ok((port, handle))
}

async fn closed_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

#[tokio::test]
async fn listening_host_yields_active_summary() -> Result<()> {
    let (port, server) = local_listener().await?;

    let cli = Cli::parse_from([
        "zpp",
        "-p",
        &port.to_string(),
        "-c",
        "3",
        "-o",
        "2",
        "-t",
        "2000",
        "127.0.0.1",
    ]);
    let config = load_config(cli)?;

    let resolver = AddressResolver::from_system_conf()?;
    let mut runner = TrialRunner::new(&config, resolver);
    let report = runner.run(&mut NullObserver).await?;

    assert_eq!(report.cycles.len(), 3);
    for cycle in &report.cycles {
        assert!(cycle.reachable());
        assert!(cycle.elapsed_ms.unwrap() >= 0.0);
    }

    let summary = &report.summary;
    assert_eq!(summary.verdict, Verdict::Active);
    assert!(summary.min_ms <= summary.avg_ms);
    assert!(summary.avg_ms <= summary.max_ms);
    assert!(summary.stddev_ms >= 0.0);
    assert_eq!(summary.total_ops, 6);
    assert_eq!(summary.host_display, "127.0.0.1");
    assert!(report.completed_at >= report.started_at);

    server.abort();
    Ok(())
}

#[tokio::test]
async fn deaf_port_yields_absent_summary() -> Result<()> {
    let port = closed_port().await?;

    let cli = Cli::parse_from([
        "zpp",
        "-p",
        &port.to_string(),
        "-c",
        "1",
        "-o",
        "1",
        "-t",
        "500",
        "127.0.0.1",
    ]);
    let config = load_config(cli)?;

    let resolver = AddressResolver::from_system_conf()?;
    let mut runner = TrialRunner::new(&config, resolver);
    let report = runner.run(&mut NullObserver).await?;

    assert_eq!(report.cycles.len(), 1);
    assert!(!report.cycles[0].reachable());
    assert_eq!(report.summary.verdict, Verdict::Absent);

    Ok(())
}

#[tokio::test]
async fn run_report_round_trips_through_json() -> Result<()> {
    let (port, server) = local_listener().await?;

    let cli = Cli::parse_from(["zpp", "-p", &port.to_string(), "-c", "2", "127.0.0.1"]);
    let config = load_config(cli)?;

    let resolver = AddressResolver::from_system_conf()?;
    let mut runner = TrialRunner::new(&config, resolver);
    let report = runner.run(&mut NullObserver).await?;

    let json = serde_json::to_string(&report)?;
    let parsed: zero_packet_probe::models::RunReport = serde_json::from_str(&json)?;
    assert_eq!(parsed.cycles.len(), report.cycles.len());
    assert_eq!(parsed.summary.verdict, report.summary.verdict);

    server.abort();
    Ok(())
}
