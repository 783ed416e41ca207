//! Reading and writing records as delimited text.
//!
//! # Architecture
//!
//! - [`RowSource`] and [`RowSink`] move raw rows; the csv-crate backed
//!   implementations apply a [`Dialect`]
//! - [`HeaderMapping`] matches an input header against a layout once per
//!   decode
//! - [`Decoder`]/[`RecordReader`] and [`Encoder`]/[`RecordWriter`] run the
//!   field conversions row by row
//!
//! # Examples
//!
//! ## Decode a file
//!
//! ```rust,ignore
//! use std::fs::File;
//!
//! let mut trades: Vec<Trade> = Vec::new();
//! csvmap::Decoder::new(File::open("trades.csv")?)
//!     .with_comment(b'#')
//!     .decode(&mut trades)?;
//! ```
//!
//! ## Stream rows out
//!
//! ```rust,ignore
//! let mut writer = csvmap::Encoder::new(std::io::stdout()).records::<Trade>()?;
//! for trade in incoming {
//!     writer.write(&trade)?;
//! }
//! writer.finish()?;
//! ```

mod decoder;
mod dialect;
mod encoder;
mod header;
mod traits;
mod trim;

pub use decoder::{Decoder, RecordReader};
pub use dialect::Dialect;
pub use encoder::{Encoder, RecordWriter};
pub use header::HeaderMapping;
pub use traits::{CsvRowSink, CsvRowSource, RowSink, RowSource};

use crate::Result;
use crate::schema::Record;
use std::io::Read;

/// Decodes a whole input with the default dialect.
///
/// # Errors
///
/// Returns the first schema, header, conversion or framing error.
pub fn decode_all<T: Record>(reader: impl Read) -> Result<Vec<T>> {
    let mut records = Vec::new();
    Decoder::new(reader).decode(&mut records)?;
    Ok(records)
}

/// Encodes records with the default dialect.
///
/// # Errors
///
/// Returns a schema error; writing to memory does not fail otherwise.
pub fn encode_all<T: Record>(values: &[T]) -> Result<Vec<u8>> {
    Encoder::new(Vec::new()).encode(values)
}
