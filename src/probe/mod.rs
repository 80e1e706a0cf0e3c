//! Probing subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeConfig.targets
//!     → schedule::cycle (A, B, C, A, ...)
//!     → runner.rs (guarded TCP connect per target)
//!     → ProbeStats on shutdown or probe limit
//! ```

pub mod runner;

pub use runner::{probe, ProbeStats, Prober};
