//! # csvmap
//!
//! Name-matched mapping between delimited text rows and typed Rust records.
//!
//! A record type declares its columns once (usually through the [`record!`]
//! macro). Decoding reads a header line, matches every header name against
//! the declared columns, then converts each data row field by field.
//! Encoding writes the declared column names as the header, followed by one
//! row per value.
//!
//! ## Features
//!
//! - Header columns may appear in any order
//! - Built-in conversions for `bool`, all integer widths, `f32`/`f64`,
//!   `String` and `chrono::DateTime<FixedOffset>`
//! - Custom field types through the [`Field`] trait
//! - Runtime column lists for schemas known only at run time
//!
//! ## Example
//!
//! ```rust
//! use chrono::{DateTime, FixedOffset};
//!
//! csvmap::record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Reading {
//!         #[column = "Sensor"]
//!         pub sensor: String,
//!         pub value: i64,
//!         #[column = "Time"]
//!         pub time: DateTime<FixedOffset>,
//!     }
//! }
//!
//! let input = "value,Sensor,Time\n42,north,2006-01-02T15:04:05-07:00\n";
//! let readings: Vec<Reading> = csvmap::decode_all(input.as_bytes())?;
//! assert_eq!(readings[0].sensor, "north");
//! assert_eq!(readings[0].value, 42);
//!
//! let output = csvmap::encode_all(&readings)?;
//! assert_eq!(
//!     String::from_utf8_lossy(&output),
//!     "Sensor,value,Time\nnorth,42,2006-01-02T15:04:05-07:00\n"
//! );
//! # Ok::<(), csvmap::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

#[macro_use]
mod macros;

pub mod codec;
pub mod config;
pub mod io;
pub mod observability;
pub mod schema;

// Re-exports for convenience
pub use codec::{ConversionError, ConversionFailure, Value};
pub use config::CsvmapConfig;
pub use io::{
    Decoder, Dialect, Encoder, HeaderMapping, RecordReader, RecordWriter, RowSink, RowSource,
    decode_all, encode_all,
};
pub use schema::{
    ColumnSpec, DynamicRow, DynamicSchema, Field, Record, ScalarKind, Schema, SchemaBuilder,
    TypeKind,
};

/// Boxed error returned by custom field conversions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for csvmap operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Schema` | A column name is empty or declared twice, a runtime kind name is unknown |
/// | `UnknownHeader` | A header name matches no declared column |
/// | `DuplicateHeader` | The header names the same column twice |
/// | `MissingHeader` | The input holds no rows at all |
/// | `Conversion` | A built-in field conversion rejects its text |
/// | `Custom` | A custom field's `decode_field` reports a failure |
/// | `FieldCount` | A data row has a different field count than the header |
/// | `Framing` | The row reader/writer reports malformed input or an I/O failure |
/// | `InvalidInput` | A dialect or configuration value is unusable |
/// | `OperationFailed` | Configuration files or logging cannot be set up |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The record schema cannot be built.
    #[error("invalid schema for {record}: {reason}")]
    Schema {
        /// Name of the record type (or runtime schema).
        record: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A header name does not match any column of the schema.
    ///
    /// Raised once per decode call, before any data row is read.
    #[error("field for header [{header}] was not found")]
    UnknownHeader {
        /// The offending header text.
        header: String,
    },

    /// The header names the same column more than once.
    #[error("duplicate header [{header}]")]
    DuplicateHeader {
        /// The repeated header text.
        header: String,
    },

    /// The input is empty; a header row is mandatory.
    #[error("input has no header row")]
    MissingHeader,

    /// A built-in conversion failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A custom field conversion failed.
    ///
    /// The message is the one produced by the custom type, unchanged.
    #[error(transparent)]
    Custom(BoxError),

    /// A data row does not have one field per header column.
    #[error("record on line {line}: wrong number of fields (expected {expected}, found {found})")]
    FieldCount {
        /// Line the row starts on, or 0 when the source does not track lines.
        line: u64,
        /// Number of header columns.
        expected: usize,
        /// Number of fields in the row.
        found: usize,
    },

    /// The underlying row reader or writer failed.
    ///
    /// Raised when:
    /// - The input is not valid UTF-8
    /// - The underlying reader or writer returns an I/O error
    #[error(transparent)]
    Framing(#[from] csv::Error),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Wraps the failure of a custom field conversion.
    ///
    /// Accepts anything convertible into a boxed error, including plain
    /// string messages.
    ///
    /// ```rust
    /// let err = csvmap::Error::custom("invalid data for custom decode");
    /// assert_eq!(err.to_string(), "invalid data for custom decode");
    /// ```
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }

    /// Returns whether this error was raised before any data row was processed.
    #[must_use]
    pub const fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::Schema { .. }
                | Self::UnknownHeader { .. }
                | Self::DuplicateHeader { .. }
                | Self::MissingHeader
                | Self::InvalidInput(_)
        )
    }

    /// Short label of the error family, used as a metrics label.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "schema",
            Self::UnknownHeader { .. } | Self::DuplicateHeader { .. } | Self::MissingHeader => {
                "header"
            },
            Self::Conversion(_) => "conversion",
            Self::Custom(_) => "custom",
            Self::FieldCount { .. } | Self::Framing(_) => "framing",
            Self::InvalidInput(_) | Self::OperationFailed { .. } => "config",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Framing(csv::Error::from(err))
    }
}

/// Result type alias for csvmap operations.
pub type Result<T> = std::result::Result<T, Error>;
