//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/JSON)
//!     → format.rs (dispatch on format name, parse into a generic tree)
//!     → decode.rs (match fields loosely, coerce scalars, squash embedded structs)
//!     → typed configuration (schema.rs), defaults kept for absent fields
//!
//! Environment:
//!     env.rs typed getters, default on absence or parse failure
//! ```
//!
//! # Design Decisions
//! - Field names compare on alphanumerics only, case-insensitively
//! - Squashing is resolved before matching; parent fields shadow embedded ones
//! - Decoding mutates in place and reports every failing field at once
//! - Duration fields take expressions (`5s`, `2m30s`), never bare numbers

pub mod decode;
pub mod duration;
pub mod env;
pub mod format;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod structure;

pub use decode::{decode, Decode, DecodeError, Decoder};
pub use format::{unmarshal, Format, FormatError};
pub use loader::{load_config, ConfigError};
pub use schema::ProbeConfig;
pub use structure::{FieldSet, Structure};
