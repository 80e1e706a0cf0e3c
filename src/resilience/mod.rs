//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Worker loop:
//!     → panic.rs guards each unit of work
//!     → a panic is logged and the loop moves on to the next unit
//! ```
//!
//! # Design Decisions
//! - Isolation at task granularity only, never around individual calls
//! - Failures are reported through `tracing`, not re-raised

pub mod panic;

pub use panic::{catch_panic, guarded};
