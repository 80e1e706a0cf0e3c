//! Flexible structural decoding.
//!
//! Maps a generic value tree (as produced by [`unmarshal`](crate::config::format::unmarshal))
//! onto typed structures:
//! - field names match after [normalization](crate::config::normalize)
//! - squashed sub-structures share their parent's input level
//! - scalars are weakly coerced between compatible representations
//! - duration fields accept expressions such as `"2m30s"`
//!
//! Input keys are visited in map order, so when two keys normalize to the
//! same field the later one wins. `serde_json::Map` iterates in sorted key
//! order, which keeps this deterministic for a given input.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::duration::parse_duration;
use crate::config::normalize::normalize;
use crate::config::structure::{FieldSet, Structure};

pub use serde_json::Value;

/// Errors produced while decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("'{field}' expected type '{expected}', got unconvertible type '{found}'")]
    Unconvertible {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{field}' cannot parse '{value}' as {expected}: {reason}")]
    Parse {
        field: String,
        expected: &'static str,
        value: String,
        reason: String,
    },

    #[error("'{field}' value {value} does not fit in {expected}")]
    OutOfRange {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("'{field}' cannot represent {value} as {expected} without loss")]
    Lossy {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("'{field}' has invalid keys: {}", .keys.join(", "))]
    UnusedKeys { field: String, keys: Vec<String> },

    #[error("{} error(s) decoding:\n{}", .0.len(), format_errors(.0))]
    Multiple(Vec<DecodeError>),
}

fn format_errors(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(|e| format!("* {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl DecodeError {
    /// Path of the offending field, `None` for an aggregate.
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::Unconvertible { field, .. }
            | DecodeError::Parse { field, .. }
            | DecodeError::OutOfRange { field, .. }
            | DecodeError::Lossy { field, .. }
            | DecodeError::UnusedKeys { field, .. } => Some(field),
            DecodeError::Multiple(_) => None,
        }
    }

    /// Every individual error, with aggregates flattened.
    pub fn errors(&self) -> Vec<&DecodeError> {
        match self {
            DecodeError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            err => vec![err],
        }
    }

    fn collect_into(self, errors: &mut Vec<DecodeError>) {
        match self {
            DecodeError::Multiple(inner) => errors.extend(inner),
            err => errors.push(err),
        }
    }

    fn from_errors(mut errors: Vec<DecodeError>) -> Result<(), DecodeError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(DecodeError::Multiple(errors)),
        }
    }
}

/// Decoder options.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    /// Coerce between compatible scalar and collection representations.
    pub weakly_typed: bool,
    /// Report input keys that match no field.
    pub error_unused: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            weakly_typed: true,
            error_unused: false,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weakly_typed(mut self, enabled: bool) -> Self {
        self.weakly_typed = enabled;
        self
    }

    pub fn error_unused(mut self, enabled: bool) -> Self {
        self.error_unused = enabled;
        self
    }

    /// Populate `output` from `input`.
    ///
    /// Fields without a matching key keep their current value. On error,
    /// fields that decoded cleanly keep their new values and the failing
    /// ones keep their old ones.
    pub fn decode<S: Structure + ?Sized>(
        &self,
        input: &Value,
        output: &mut S,
    ) -> Result<(), DecodeError> {
        decode_struct(output, input, &Context::root(self))
    }
}

/// Decode with the default options: weak typing on, unused keys ignored.
pub fn decode<S: Structure + ?Sized>(input: &Value, output: &mut S) -> Result<(), DecodeError> {
    Decoder::default().decode(input, output)
}

/// Position inside the input tree plus the active options.
#[derive(Debug, Clone)]
pub struct Context<'d> {
    decoder: &'d Decoder,
    path: String,
}

impl<'d> Context<'d> {
    pub fn root(decoder: &'d Decoder) -> Self {
        Self {
            decoder,
            path: String::new(),
        }
    }

    /// Dotted path of the current field, empty at the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn weakly_typed(&self) -> bool {
        self.decoder.weakly_typed
    }

    pub fn field(&self, name: &str) -> Context<'d> {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        };
        Context {
            decoder: self.decoder,
            path,
        }
    }

    pub fn index(&self, index: usize) -> Context<'d> {
        Context {
            decoder: self.decoder,
            path: format!("{}[{}]", self.path, index),
        }
    }

    pub fn key(&self, key: &str) -> Context<'d> {
        Context {
            decoder: self.decoder,
            path: format!("{}[{}]", self.path, key),
        }
    }

    pub fn unconvertible(&self, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::Unconvertible {
            field: self.path.clone(),
            expected,
            found: kind(found),
        }
    }

    pub fn parse_error(
        &self,
        expected: &'static str,
        value: &str,
        reason: impl fmt::Display,
    ) -> DecodeError {
        DecodeError::Parse {
            field: self.path.clone(),
            expected,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(&self, expected: &'static str, value: impl fmt::Display) -> DecodeError {
        DecodeError::OutOfRange {
            field: self.path.clone(),
            expected,
            value: value.to_string(),
        }
    }

    pub fn lossy(&self, expected: &'static str, value: impl fmt::Display) -> DecodeError {
        DecodeError::Lossy {
            field: self.path.clone(),
            expected,
            value: value.to_string(),
        }
    }
}

/// Name of the kind of an input value, as used in error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// A type that can be populated in place from an input value.
///
/// Implement it for your own types to hook custom conversions into the
/// decoder; [`Duration`] is handled this way.
pub trait Decode {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError>;
}

/// Null input leaves the target untouched.
fn decode_field<T: Decode + ?Sized>(
    target: &mut T,
    input: &Value,
    cx: &Context<'_>,
) -> Result<(), DecodeError> {
    if input.is_null() {
        return Ok(());
    }
    target.decode(input, cx)
}

/// Decode a map into the effective field set of a structure.
pub fn decode_struct<S: Structure + ?Sized>(
    target: &mut S,
    input: &Value,
    cx: &Context<'_>,
) -> Result<(), DecodeError> {
    let map = match input {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        other => return Err(cx.unconvertible("struct", other)),
    };

    let mut set = FieldSet::new();
    target.fields(&mut set);
    let mut fields = set.resolve();

    let mut errors = Vec::new();
    let mut unused = Vec::new();
    for (key, value) in map {
        let normalized = normalize(key);
        match fields.iter_mut().find(|f| f.key == normalized) {
            Some(field) => {
                if let Err(err) = decode_field(&mut *field.target, value, &cx.field(field.name)) {
                    err.collect_into(&mut errors);
                }
            }
            None => unused.push(key.clone()),
        }
    }

    if cx.decoder.error_unused && !unused.is_empty() {
        errors.push(DecodeError::UnusedKeys {
            field: cx.path.clone(),
            keys: unused,
        });
    }

    DecodeError::from_errors(errors)
}

fn parse_bool(input: &str) -> Option<bool> {
    let input = input.trim();
    if input.is_empty() {
        Some(false)
    } else if ["true", "t", "1"].iter().any(|s| input.eq_ignore_ascii_case(s)) {
        Some(true)
    } else if ["false", "f", "0"].iter().any(|s| input.eq_ignore_ascii_case(s)) {
        Some(false)
    } else {
        None
    }
}

impl Decode for bool {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        *self = match input {
            Value::Bool(b) => *b,
            Value::Number(n) if cx.weakly_typed() => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) if cx.weakly_typed() => {
                parse_bool(s).ok_or_else(|| cx.parse_error("bool", s, "expected true or false"))?
            }
            other => return Err(cx.unconvertible("bool", other)),
        };
        Ok(())
    }
}

/// Accepts an optional sign and a `0x`, `0o` or `0b` radix prefix. A bare
/// leading zero also selects octal, so `"0755"` is 493.
fn parse_integer(input: &str) -> Option<i128> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn integer_from(input: &Value, cx: &Context<'_>, expected: &'static str) -> Result<i128, DecodeError> {
    match input {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() || f.abs() >= i128::MAX as f64 {
                    Err(cx.out_of_range(expected, n))
                } else if f.fract() != 0.0 {
                    Err(cx.lossy(expected, n))
                } else {
                    Ok(f as i128)
                }
            }
        }
        Value::Bool(b) if cx.weakly_typed() => Ok(i128::from(*b)),
        Value::String(s) if cx.weakly_typed() => {
            parse_integer(s).ok_or_else(|| cx.parse_error(expected, s, "invalid integer"))
        }
        other => Err(cx.unconvertible(expected, other)),
    }
}

macro_rules! decode_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
                let wide = integer_from(input, cx, stringify!($ty))?;
                *self = <$ty>::try_from(wide).map_err(|_| cx.out_of_range(stringify!($ty), wide))?;
                Ok(())
            }
        }
    )*};
}

decode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn float_from(input: &Value, cx: &Context<'_>, expected: &'static str) -> Result<f64, DecodeError> {
    match input {
        Value::Number(n) => n.as_f64().ok_or_else(|| cx.unconvertible(expected, input)),
        Value::Bool(b) if cx.weakly_typed() => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) if cx.weakly_typed() => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed.parse::<f64>().map_err(|e| cx.parse_error(expected, s, e))
        }
        other => Err(cx.unconvertible(expected, other)),
    }
}

impl Decode for f64 {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        *self = float_from(input, cx, "f64")?;
        Ok(())
    }
}

impl Decode for f32 {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        let wide = float_from(input, cx, "f32")?;
        let narrow = wide as f32;
        if narrow.is_infinite() && wide.is_finite() {
            return Err(cx.out_of_range("f32", wide));
        }
        *self = narrow;
        Ok(())
    }
}

impl Decode for String {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        *self = match input {
            Value::String(s) => s.clone(),
            Value::Bool(b) if cx.weakly_typed() => (if *b { "1" } else { "0" }).to_string(),
            Value::Number(n) if cx.weakly_typed() => n.to_string(),
            other => return Err(cx.unconvertible("string", other)),
        };
        Ok(())
    }
}

/// Durations are only read from expressions carrying a unit; a bare
/// number is rejected since its unit would be a guess.
impl Decode for Duration {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        match input {
            Value::String(s) => {
                *self = parse_duration(s).map_err(|e| cx.parse_error("duration", s, e))?;
                Ok(())
            }
            other => Err(cx.unconvertible("duration", other)),
        }
    }
}

impl Decode for Value {
    fn decode(&mut self, input: &Value, _cx: &Context<'_>) -> Result<(), DecodeError> {
        *self = input.clone();
        Ok(())
    }
}

impl<T: Decode + Default> Decode for Option<T> {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        if input.is_null() {
            return Ok(());
        }
        match self {
            Some(inner) => inner.decode(input, cx),
            None => {
                let mut inner = T::default();
                inner.decode(input, cx)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }
}

/// Sequences are replaced, never merged element-wise.
impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
        match input {
            Value::Array(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                let mut errors = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    let mut element = T::default();
                    if let Err(err) = decode_field(&mut element, item, &cx.index(i)) {
                        err.collect_into(&mut errors);
                    }
                    decoded.push(element);
                }
                DecodeError::from_errors(errors)?;
                *self = decoded;
                Ok(())
            }
            Value::Object(map) if cx.weakly_typed() && map.is_empty() => {
                self.clear();
                Ok(())
            }
            other if cx.weakly_typed() => {
                let mut element = T::default();
                element.decode(other, &cx.index(0))?;
                *self = vec![element];
                Ok(())
            }
            other => Err(cx.unconvertible("array", other)),
        }
    }
}

macro_rules! decode_map {
    ($($map:ident),* $(,)?) => {$(
        impl<T: Decode + Default> Decode for $map<String, T> {
            fn decode(&mut self, input: &Value, cx: &Context<'_>) -> Result<(), DecodeError> {
                let maps: Vec<(&serde_json::Map<String, Value>, Context<'_>)> = match input {
                    Value::Object(map) => vec![(map, cx.clone())],
                    Value::Array(items)
                        if cx.weakly_typed() && items.iter().all(Value::is_object) =>
                    {
                        items
                            .iter()
                            .enumerate()
                            .filter_map(|(i, item)| item.as_object().map(|m| (m, cx.index(i))))
                            .collect()
                    }
                    other => return Err(cx.unconvertible("map", other)),
                };

                let mut errors = Vec::new();
                for (map, cx) in maps {
                    for (key, value) in map {
                        let entry_cx = cx.key(key);
                        let result = match self.get_mut(key) {
                            Some(existing) => decode_field(existing, value, &entry_cx),
                            None => {
                                let mut fresh = T::default();
                                let result = decode_field(&mut fresh, value, &entry_cx);
                                if result.is_ok() {
                                    self.insert(key.clone(), fresh);
                                }
                                result
                            }
                        };
                        if let Err(err) = result {
                            err.collect_into(&mut errors);
                        }
                    }
                }
                DecodeError::from_errors(errors)
            }
        }
    )*};
}

decode_map!(HashMap, BTreeMap);
