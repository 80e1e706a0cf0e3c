//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::decode::{decode, DecodeError, Value};
use crate::config::format::{unmarshal, FormatError};
use crate::config::structure::Structure;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Format(#[from] FormatError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Decode a document held in memory on top of the current contents of `output`.
pub fn load_bytes<S: Structure + ?Sized>(
    input: &[u8],
    format: &str,
    output: &mut S,
) -> Result<(), ConfigError> {
    let tree: Value = unmarshal(input, format)?;
    decode(&tree, output)?;
    Ok(())
}

/// Load a configuration file, starting from the type's defaults.
pub fn load_config<S: Structure + Default>(path: &Path, format: &str) -> Result<S, ConfigError> {
    let content = fs::read(path)?;
    let mut config = S::default();
    load_bytes(&content, format, &mut config)?;

    tracing::debug!(path = %path.display(), format, "Configuration loaded");
    Ok(config)
}
