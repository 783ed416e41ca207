//! Text conversions for the built-in field kinds.
//!
//! Decoding turns one field's text into a value of a [`ScalarKind`];
//! encoding is total and turns a value back into text. The typed
//! [`Field`](crate::Field) impls and the runtime [`Value`] share these
//! helpers, so both paths produce identical text.
//!
//! # Text forms
//!
//! | Kind | Decode accepts | Encode produces |
//! |------|----------------|-----------------|
//! | `bool` | `1 t T TRUE true True 0 f F FALSE false False` | `true` / `false` |
//! | integers | base-10, optional sign (signed kinds only) | base-10, `-` only when negative |
//! | `f32` | decimal or exponent literal, `inf`, `nan` | fixed point, 6 decimals |
//! | `f64` | decimal or exponent literal, `inf`, `nan` | fixed point, 15 decimals |
//! | `string` | anything, verbatim | verbatim |
//! | `timestamp` | RFC 3339 with an explicit offset | RFC 3339, whole seconds, original offset |

use crate::schema::ScalarKind;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;
use thiserror::Error;

/// Digits after the decimal point when encoding `f32`.
pub const F32_PRECISION: usize = 6;

/// Digits after the decimal point when encoding `f64`.
pub const F64_PRECISION: usize = 15;

/// Why a field's text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionFailure {
    /// The text is not a literal of the kind.
    #[error("invalid syntax")]
    Syntax,
    /// The literal does not fit the kind's width.
    #[error("value out of range")]
    Range,
    /// The text is not an RFC 3339 date-time.
    #[error("expected RFC 3339 date-time with offset, e.g. 2006-01-02T15:04:05Z07:00 ({0})")]
    Timestamp(String),
}

/// A field's text could not be converted to its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {text:?} as {kind}: {failure}{}", width_note(.kind, .failure))]
pub struct ConversionError {
    /// The declared kind of the field.
    pub kind: ScalarKind,
    /// The offending text.
    pub text: String,
    /// The reason for the rejection.
    pub failure: ConversionFailure,
}

impl ConversionError {
    /// Creates a conversion error.
    #[must_use]
    pub fn new(kind: ScalarKind, text: &str, failure: ConversionFailure) -> Self {
        Self {
            kind,
            text: text.to_string(),
            failure,
        }
    }
}

/// Names the bit width of the kind when the literal overflowed it.
fn width_note(kind: &ScalarKind, failure: &ConversionFailure) -> String {
    match (failure, kind.bits()) {
        (ConversionFailure::Range, Some(bits)) => format!(" ({bits}-bit)"),
        _ => String::new(),
    }
}

/// A decoded field of a built-in kind.
///
/// Used by runtime schemas, where rows are lists of values rather than
/// typed structs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `bool`.
    Bool(bool),
    /// `i8`.
    I8(i8),
    /// `i16`.
    I16(i16),
    /// `i32`.
    I32(i32),
    /// `i64`.
    I64(i64),
    /// `isize`.
    Isize(isize),
    /// `u8`.
    U8(u8),
    /// `u16`.
    U16(u16),
    /// `u32`.
    U32(u32),
    /// `u64`.
    U64(u64),
    /// `usize`.
    Usize(usize),
    /// `f32`.
    F32(f32),
    /// `f64`.
    F64(f64),
    /// Text.
    String(String),
    /// Instant with its original UTC offset.
    Timestamp(DateTime<FixedOffset>),
}

impl Value {
    /// Returns the zero value of a kind.
    ///
    /// The zero timestamp is the Unix epoch, matching
    /// `DateTime::<FixedOffset>::default()` on typed records.
    ///
    /// Columns absent from an input header keep this value.
    #[must_use]
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(false),
            ScalarKind::I8 => Self::I8(0),
            ScalarKind::I16 => Self::I16(0),
            ScalarKind::I32 => Self::I32(0),
            ScalarKind::I64 => Self::I64(0),
            ScalarKind::Isize => Self::Isize(0),
            ScalarKind::U8 => Self::U8(0),
            ScalarKind::U16 => Self::U16(0),
            ScalarKind::U32 => Self::U32(0),
            ScalarKind::U64 => Self::U64(0),
            ScalarKind::Usize => Self::Usize(0),
            ScalarKind::F32 => Self::F32(0.0),
            ScalarKind::F64 => Self::F64(0.0),
            ScalarKind::String => Self::String(String::new()),
            ScalarKind::Timestamp => Self::Timestamp(DateTime::<FixedOffset>::default()),
        }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::Isize(_) => ScalarKind::Isize,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::Usize(_) => ScalarKind::Usize,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::String(_) => ScalarKind::String,
            Self::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    /// Encodes the value as field text.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Bool(v) => format_bool(*v).to_string(),
            Self::I8(v) => v.to_string(),
            Self::I16(v) => v.to_string(),
            Self::I32(v) => v.to_string(),
            Self::I64(v) => v.to_string(),
            Self::Isize(v) => v.to_string(),
            Self::U8(v) => v.to_string(),
            Self::U16(v) => v.to_string(),
            Self::U32(v) => v.to_string(),
            Self::U64(v) => v.to_string(),
            Self::Usize(v) => v.to_string(),
            Self::F32(v) => format_f32(*v),
            Self::F64(v) => format_f64(*v),
            Self::String(v) => v.clone(),
            Self::Timestamp(v) => format_timestamp(v),
        }
    }
}

/// Decodes one field's text as the given kind.
///
/// # Errors
///
/// Returns a [`ConversionError`] naming the kind and the text when the text
/// is not a valid literal of the kind.
pub fn decode_scalar(kind: ScalarKind, text: &str) -> Result<Value, ConversionError> {
    Ok(match kind {
        ScalarKind::Bool => Value::Bool(parse_bool(text)?),
        ScalarKind::I8 => Value::I8(parse_int(kind, text)?),
        ScalarKind::I16 => Value::I16(parse_int(kind, text)?),
        ScalarKind::I32 => Value::I32(parse_int(kind, text)?),
        ScalarKind::I64 => Value::I64(parse_int(kind, text)?),
        ScalarKind::Isize => Value::Isize(parse_int(kind, text)?),
        ScalarKind::U8 => Value::U8(parse_int(kind, text)?),
        ScalarKind::U16 => Value::U16(parse_int(kind, text)?),
        ScalarKind::U32 => Value::U32(parse_int(kind, text)?),
        ScalarKind::U64 => Value::U64(parse_int(kind, text)?),
        ScalarKind::Usize => Value::Usize(parse_int(kind, text)?),
        ScalarKind::F32 => Value::F32(parse_f32(text)?),
        ScalarKind::F64 => Value::F64(parse_f64(text)?),
        ScalarKind::String => Value::String(text.to_string()),
        ScalarKind::Timestamp => Value::Timestamp(parse_timestamp(text)?),
    })
}

/// Parses a boolean literal.
pub fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionError::new(
            ScalarKind::Bool,
            text,
            ConversionFailure::Syntax,
        )),
    }
}

/// Parses a base-10 integer checked against the width of `kind`.
pub fn parse_int<T>(kind: ScalarKind, text: &str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    // Unsigned literals carry no sign at all, not even '+'.
    if kind.is_unsigned() && text.starts_with(['+', '-']) {
        return Err(ConversionError::new(kind, text, ConversionFailure::Syntax));
    }

    text.parse::<T>().map_err(|e| {
        let failure = match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ConversionFailure::Range,
            _ => ConversionFailure::Syntax,
        };
        ConversionError::new(kind, text, failure)
    })
}

/// Parses a 32-bit float literal.
pub fn parse_f32(text: &str) -> Result<f32, ConversionError> {
    let value = text
        .parse::<f32>()
        .map_err(|_| ConversionError::new(ScalarKind::F32, text, ConversionFailure::Syntax))?;
    check_overflow(ScalarKind::F32, text, value.is_infinite())?;
    Ok(value)
}

/// Parses a 64-bit float literal.
pub fn parse_f64(text: &str) -> Result<f64, ConversionError> {
    let value = text
        .parse::<f64>()
        .map_err(|_| ConversionError::new(ScalarKind::F64, text, ConversionFailure::Syntax))?;
    check_overflow(ScalarKind::F64, text, value.is_infinite())?;
    Ok(value)
}

/// A finite literal that rounds to infinity does not fit the width.
fn check_overflow(kind: ScalarKind, text: &str, infinite: bool) -> Result<(), ConversionError> {
    if !infinite {
        return Ok(());
    }
    let unsigned = text.trim_start_matches(['+', '-']);
    let spelled_infinite = unsigned
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("inf"));
    if spelled_infinite {
        Ok(())
    } else {
        Err(ConversionError::new(kind, text, ConversionFailure::Range))
    }
}

/// Parses an RFC 3339 date-time, keeping its offset.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    DateTime::parse_from_rfc3339(text).map_err(|e| {
        ConversionError::new(
            ScalarKind::Timestamp,
            text,
            ConversionFailure::Timestamp(e.to_string()),
        )
    })
}

/// Encodes a boolean.
#[must_use]
pub const fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Encodes an `f32` with six decimals.
#[must_use]
pub fn format_f32(value: f32) -> String {
    format_fixed(f64::from(value), F32_PRECISION)
}

/// Encodes an `f64` with fifteen decimals.
#[must_use]
pub fn format_f64(value: f64) -> String {
    format_fixed(value, F64_PRECISION)
}

fn format_fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else {
        format!("{value:.precision$}")
    }
}

/// Encodes a timestamp as RFC 3339 in its own offset.
#[must_use]
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
