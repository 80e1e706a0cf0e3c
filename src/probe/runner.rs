//! Cyclic TCP probing.
//!
//! # Responsibilities
//! - Walk the configured targets in a repeating cycle
//! - Attempt a TCP connect to each, bounded by the connect timeout
//! - Keep going when a single probe fails or panics

use std::io;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time;

use crate::config::schema::{ProbeConfig, Target};
use crate::lifecycle::Shutdown;
use crate::resilience::guarded;
use crate::schedule::infinite_range;

/// Outcome counters of a probing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub succeeded: u64,
    pub failed: u64,
    pub panicked: u64,
}

impl ProbeStats {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.panicked
    }
}

pub struct Prober {
    config: ProbeConfig,
}

impl Prober {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Probe until `shutdown` fires or `max_probes` is reached.
    pub async fn run(self, shutdown: Shutdown) -> ProbeStats {
        let timing = &self.config.timing;
        tracing::info!(
            targets = self.config.targets.len(),
            interval = ?timing.interval,
            connect_timeout = ?timing.connect_timeout,
            max_probes = ?self.config.max_probes,
            labels = ?self.config.labels,
            "Prober starting"
        );

        // Reaching max_probes ends this run only, not the whole process.
        let run = shutdown.child();
        let mut cycle = infinite_range(self.config.targets.clone(), run.token());
        let mut stats = ProbeStats::default();

        while let Some(target) = cycle.recv().await {
            match guarded(&target.name, probe(&target, timing.connect_timeout)).await {
                Some(Ok(elapsed)) => {
                    stats.succeeded += 1;
                    tracing::info!(name = %target.name, address = %target.address, ?elapsed, "Probe succeeded");
                }
                Some(Err(e)) => {
                    stats.failed += 1;
                    tracing::warn!(name = %target.name, address = %target.address, error = %e, "Probe failed");
                }
                None => stats.panicked += 1,
            }

            if self.config.max_probes.is_some_and(|max| stats.total() >= max) {
                tracing::info!(probes = stats.total(), "Probe limit reached");
                run.trigger();
                break;
            }

            tokio::select! {
                _ = time::sleep(timing.interval) => {}
                _ = run.cancelled() => {}
            }
        }

        cycle.shutdown().await;
        tracing::info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            panicked = stats.panicked,
            "Prober stopped"
        );
        stats
    }
}

/// Connect to `target`, returning the time it took.
pub async fn probe(target: &Target, connect_timeout: Duration) -> io::Result<Duration> {
    let start = Instant::now();
    time::timeout(connect_timeout, TcpStream::connect(target.address.as_str()))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;
    Ok(start.elapsed())
}
