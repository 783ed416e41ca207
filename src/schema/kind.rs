//! Field type classification.
//!
//! Every column has a [`TypeKind`]: one of the built-in [`ScalarKind`]s or
//! `Custom`. A Rust type takes part in a schema by implementing [`Field`];
//! the crate implements it for all built-in kinds, and any other type that
//! implements both conversion directions is classified as `Custom`.

use crate::Result;
use crate::codec;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::str::FromStr;

/// The built-in field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// Platform-width signed integer (`isize`).
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// Platform-width unsigned integer (`usize`).
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `String`.
    String,
    /// `chrono::DateTime<FixedOffset>`.
    Timestamp,
}

impl ScalarKind {
    /// Returns all built-in kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bool,
            Self::I8,
            Self::I16,
            Self::I32,
            Self::I64,
            Self::Isize,
            Self::U8,
            Self::U16,
            Self::U32,
            Self::U64,
            Self::Usize,
            Self::F32,
            Self::F64,
            Self::String,
            Self::Timestamp,
        ]
    }

    /// Returns the canonical name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Timestamp => "timestamp",
        }
    }

    /// Parses a kind name.
    ///
    /// Accepts the canonical names plus a few common aliases
    /// (`boolean`, `int`, `uint`, `float`, `double`, `str`, `text`, `datetime`).
    /// Returns `None` if the name is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Some(Self::Bool),
            "i8" => Some(Self::I8),
            "i16" => Some(Self::I16),
            "i32" => Some(Self::I32),
            "i64" => Some(Self::I64),
            "isize" | "int" => Some(Self::Isize),
            "u8" => Some(Self::U8),
            "u16" => Some(Self::U16),
            "u32" => Some(Self::U32),
            "u64" => Some(Self::U64),
            "usize" | "uint" => Some(Self::Usize),
            "f32" | "float" => Some(Self::F32),
            "f64" | "double" => Some(Self::F64),
            "string" | "str" | "text" => Some(Self::String),
            "timestamp" | "datetime" => Some(Self::Timestamp),
            _ => None,
        }
    }

    /// Returns whether the kind is an unsigned integer.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    /// Returns the bit width of integer and float kinds.
    #[must_use]
    pub const fn bits(&self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::I64 | Self::U64 | Self::F64 => Some(64),
            Self::Isize | Self::Usize => Some(usize::BITS),
            Self::Bool | Self::String | Self::Timestamp => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidInput(format!("unknown field kind: {s}")))
    }
}

/// Classification of a column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A built-in kind converted by [`codec`].
    Scalar(ScalarKind),
    /// A type supplying its own conversions through [`Field`].
    Custom,
}

impl TypeKind {
    /// Returns the built-in kind, if any.
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => kind.fmt(f),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// A type that can be stored in a record column.
///
/// Implemented by this crate for `bool`, every integer width, `f32`, `f64`,
/// `String` and `DateTime<FixedOffset>`. Other types implement both methods
/// and keep the default [`kind`](Field::kind), which classifies them as
/// [`TypeKind::Custom`].
///
/// ```rust
/// use csvmap::{Error, Field};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Pair {
///     name: String,
///     count: i32,
/// }
///
/// impl Field for Pair {
///     fn decode_field(&mut self, text: &str) -> csvmap::Result<()> {
///         let (name, count) = text
///             .split_once('|')
///             .ok_or_else(|| Error::custom("expected name|count"))?;
///         self.name = name.to_string();
///         self.count = count.parse().map_err(Error::custom)?;
///         Ok(())
///     }
///
///     fn encode_field(&self) -> String {
///         format!("{}|{}", self.name, self.count)
///     }
/// }
///
/// let mut pair = Pair::default();
/// pair.decode_field("apples|3")?;
/// assert_eq!(pair.encode_field(), "apples|3");
/// assert_eq!(Pair::kind(), csvmap::TypeKind::Custom);
/// # Ok::<(), csvmap::Error>(())
/// ```
pub trait Field: Sized {
    /// Returns the classification of the type.
    fn kind() -> TypeKind {
        TypeKind::Custom
    }

    /// Replaces the stored value with the one described by `text`.
    ///
    /// Errors returned here abort the decode call unchanged.
    fn decode_field(&mut self, text: &str) -> Result<()>;

    /// Returns the text form of the stored value.
    fn encode_field(&self) -> String;
}

macro_rules! int_field {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Field for $ty {
                fn kind() -> TypeKind {
                    TypeKind::Scalar(ScalarKind::$kind)
                }

                fn decode_field(&mut self, text: &str) -> Result<()> {
                    *self = codec::parse_int(ScalarKind::$kind, text)?;
                    Ok(())
                }

                fn encode_field(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

int_field!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

impl Field for bool {
    fn kind() -> TypeKind {
        TypeKind::Scalar(ScalarKind::Bool)
    }

    fn decode_field(&mut self, text: &str) -> Result<()> {
        *self = codec::parse_bool(text)?;
        Ok(())
    }

    fn encode_field(&self) -> String {
        codec::format_bool(*self).to_string()
    }
}

impl Field for f32 {
    fn kind() -> TypeKind {
        TypeKind::Scalar(ScalarKind::F32)
    }

    fn decode_field(&mut self, text: &str) -> Result<()> {
        *self = codec::parse_f32(text)?;
        Ok(())
    }

    fn encode_field(&self) -> String {
        codec::format_f32(*self)
    }
}

impl Field for f64 {
    fn kind() -> TypeKind {
        TypeKind::Scalar(ScalarKind::F64)
    }

    fn decode_field(&mut self, text: &str) -> Result<()> {
        *self = codec::parse_f64(text)?;
        Ok(())
    }

    fn encode_field(&self) -> String {
        codec::format_f64(*self)
    }
}

impl Field for String {
    fn kind() -> TypeKind {
        TypeKind::Scalar(ScalarKind::String)
    }

    fn decode_field(&mut self, text: &str) -> Result<()> {
        text.clone_into(self);
        Ok(())
    }

    fn encode_field(&self) -> String {
        self.clone()
    }
}

impl Field for DateTime<FixedOffset> {
    fn kind() -> TypeKind {
        TypeKind::Scalar(ScalarKind::Timestamp)
    }

    fn decode_field(&mut self, text: &str) -> Result<()> {
        *self = codec::parse_timestamp(text)?;
        Ok(())
    }

    fn encode_field(&self) -> String {
        codec::format_timestamp(self)
    }
}
