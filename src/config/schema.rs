//! Configuration schema of the `appkit` prober.
//!
//! Field names are matched loosely, so `connect-timeout`, `connectTimeout`
//! and `CONNECT_TIMEOUT` all address [`Timing::connect_timeout`].

use std::collections::HashMap;
use std::time::Duration;

use crate::structure;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeConfig {
    /// Endpoints probed in a repeating cycle.
    pub targets: Vec<Target>,

    /// Pacing, read from the document's top level.
    pub timing: Timing,

    /// Stop after this many probes; run until interrupted when unset.
    pub max_probes: Option<u64>,

    /// Free-form labels attached to every log line.
    pub labels: HashMap<String, String>,
}

structure!(ProbeConfig { targets, #[squash] timing, max_probes, labels });

/// Probe pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    /// Pause between two probes.
    pub interval: Duration,

    /// TCP connect deadline for a single probe.
    pub connect_timeout: Duration,
}

structure!(Timing { interval, connect_timeout });

impl Default for Timing {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

/// A single endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    /// Identifier used in logs.
    pub name: String,

    /// `host:port` to connect to.
    pub address: String,
}

structure!(Target { name, address = "addr" });
