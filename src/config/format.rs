//! Format dispatch for configuration documents.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for [`unmarshal`].
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown config format: {0}")]
    Unknown(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Recognized document formats.
///
/// JSON documents are valid YAML, so both go through the YAML parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "yaml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(FormatError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

impl Format {
    pub fn deserialize<T: DeserializeOwned>(self, input: &[u8]) -> Result<T, FormatError> {
        match self {
            Format::Json | Format::Yaml => Ok(serde_yaml::from_slice(input)?),
        }
    }
}

/// Deserialize `input` written in the named format (`""`, `"json"` or `"yaml"`).
pub fn unmarshal<T: DeserializeOwned>(input: &[u8], format: &str) -> Result<T, FormatError> {
    format.parse::<Format>()?.deserialize(input)
}
