//! Single zero-payload TCP connect probe

use crate::{
    models::{FailureKind, ProbeOutcome},
    resolver::ResolvedAddress,
};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};

/// Performs one timed TCP handshake per call
///
/// No data is written or read; the connection is closed as soon as the
/// handshake completes, so the measured interval is the connect-to-close
/// cost alone. Each call creates and destroys exactly one socket, and all
/// failure is reported through the returned [`ProbeOutcome`], never raised.
#[derive(Debug, Clone)]
pub struct ConnectProbe {
    timeout: Duration,
}

impl ConnectProbe {
    /// Create a probe with the given per-attempt timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt one TCP handshake to `(addr, port)` and time it
    pub async fn probe(&self, addr: &ResolvedAddress, port: u16) -> ProbeOutcome {
        let target = SocketAddr::new(addr.ip, port);

        let start = Instant::now();
        match timeout(self.timeout, TcpStream::connect(target)).await {
            Ok(Ok(stream)) => {
                // Tear down before taking the end timestamp, so close cost
                // stays inside the measured interval.
                drop(stream);
                ProbeOutcome::reachable(start.elapsed())
            }
            Ok(Err(err)) => ProbeOutcome::failed(classify(&err)),
            Err(_) => ProbeOutcome::failed(FailureKind::Timeout),
        }
    }
}

/// Map a connect error to its outcome classification
fn classify(err: &io::Error) -> FailureKind {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => FailureKind::Refused,
        io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
            FailureKind::Unreachable
        }
        io::ErrorKind::AddrNotAvailable | io::ErrorKind::Unsupported => {
            FailureKind::UnsupportedFamily
        }
        io::ErrorKind::TimedOut => FailureKind::Timeout,
        _ => FailureKind::Unknown,
    }
}
