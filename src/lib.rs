//! Configuration and control-flow helpers.
//!
//! - [`config`]: loose structural decoding, format dispatch, env getters
//! - [`schedule`]: cancelable cyclic sequences
//! - [`resilience`]: panic isolation for units of work
//! - [`lifecycle`]: shutdown signal and OS signal wiring
//! - [`probe`]: the cyclic TCP prober behind the `appkit` binary

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod resilience;
pub mod schedule;

pub use config::{decode, unmarshal, Decode, Decoder, ProbeConfig, Structure};
pub use lifecycle::Shutdown;
pub use schedule::{infinite_range, Cycle};
