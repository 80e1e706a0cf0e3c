//! Scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! ordered work items (targets, jobs)
//!     → cycle.rs (background producer, capacity-one hand-off)
//!     → worker loop receives A, B, C, A, B, C, ...
//!     → cancellation closes the channel, producer task exits
//! ```
//!
//! # Design Decisions
//! - One producer task per cycle, sole owner of the sender
//! - Cancellation wins every race against delivery
//! - An empty list closes the cycle instead of spinning

pub mod cycle;

pub use cycle::{infinite_range, Cycle};
