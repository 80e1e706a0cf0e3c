//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events with key-value fields
//!     → logging.rs (EnvFilter + fmt layer on stdout)
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted messages
//! - Log level configurable via `RUST_LOG`

pub mod logging;

pub use logging::init_logging;
