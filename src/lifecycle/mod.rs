//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every observer's cancelled() resolves
//!             → producers close their channels, loops exit
//! ```
//!
//! # Design Decisions
//! - One signal for the whole process; children for narrower scopes
//! - Triggering is idempotent and cannot be undone

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
