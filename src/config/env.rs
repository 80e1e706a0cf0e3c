//! Typed environment variable lookup with defaults.
//!
//! Every getter falls back to the supplied default when the variable is
//! unset or does not parse as the requested type. Parse failures are
//! logged at debug level and otherwise swallowed.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::config::duration::parse_duration;

fn lookup<T, E: Display>(key: &str, default: T, parse: impl FnOnce(&str) -> Result<T, E>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match parse(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(key, value = %raw, error = %e, "Ignoring unparsable environment variable");
            default
        }
    }
}

/// Any [`FromStr`] type.
pub fn get_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    lookup(key, default, str::parse::<T>)
}

pub fn get_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn get_int(key: &str, default: i64) -> i64 {
    get_or(key, default)
}

/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts.
pub fn get_bool(key: &str, default: bool) -> bool {
    lookup(key, default, |raw| match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("invalid boolean"),
    })
}

pub fn get_duration(key: &str, default: Duration) -> Duration {
    lookup(key, default, parse_duration)
}
