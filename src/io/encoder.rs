//! Record encoding.

use super::Dialect;
use super::traits::{CsvRowSink, RowSink};
use crate::schema::{DynamicRow, DynamicSchema, Layout, Record, Schema};
use crate::{Error, Result};
use csv::StringRecord;
use std::io::Write;
use std::sync::Arc;

/// Encodes records as delimited text.
///
/// ```rust
/// csvmap::record! {
///     #[derive(Debug, Default)]
///     struct Point {
///         x: i32,
///         y: i32,
///     }
/// }
///
/// let out = csvmap::Encoder::new(Vec::new())
///     .with_crlf(true)
///     .encode(&[Point { x: 1, y: -2 }])?;
/// assert_eq!(out, b"x,y\r\n1,-2\r\n");
/// # Ok::<(), csvmap::Error>(())
/// ```
#[derive(Debug)]
pub struct Encoder<W> {
    writer: W,
    dialect: Dialect,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder with the default dialect.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            dialect: Dialect::default(),
        }
    }

    /// Replaces the whole dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the field separator.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.dialect.delimiter = delimiter;
        self
    }

    /// Selects `\r\n` or `\n` row terminators.
    #[must_use]
    pub const fn with_crlf(mut self, crlf: bool) -> Self {
        self.dialect.crlf = crlf;
        self
    }

    /// Sets the field separator.
    pub const fn set_delimiter(&mut self, delimiter: u8) {
        self.dialect.delimiter = delimiter;
    }

    /// Selects `\r\n` or `\n` row terminators.
    pub const fn set_crlf(&mut self, crlf: bool) {
        self.dialect.crlf = crlf;
    }

    /// The dialect the next encode will use.
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Writes the header and one row per value, then flushes.
    ///
    /// The header is written even when `values` is empty.
    ///
    /// # Errors
    ///
    /// Returns an invalid dialect, a schema error, or the first write or
    /// flush failure.
    pub fn encode<T: Record>(self, values: &[T]) -> Result<W> {
        let schema = Schema::<T>::cached()?;
        self.encode_with(schema, values)
    }

    /// Encodes rows of a runtime schema.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::encode`].
    pub fn encode_dynamic(self, schema: &DynamicSchema, rows: &[DynamicRow]) -> Result<W> {
        self.encode_with(schema, rows)
    }

    /// Encodes rows of any layout.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::encode`].
    pub fn encode_with<L: Layout>(self, layout: L, values: &[L::Row]) -> Result<W> {
        let mut writer = self.rows(layout)?;
        writer.write_all(values)?;
        writer.finish()?.into_inner()
    }

    /// Opens a row-by-row writer of typed records.
    ///
    /// # Errors
    ///
    /// Returns an invalid dialect or a schema error.
    pub fn records<T: Record>(self) -> Result<RecordWriter<CsvRowSink<W>, Arc<Schema<T>>>> {
        let schema = Schema::<T>::cached()?;
        self.rows(schema)
    }

    /// Opens a row-by-row writer for any layout.
    ///
    /// # Errors
    ///
    /// Returns an invalid dialect.
    pub fn rows<L: Layout>(self, layout: L) -> Result<RecordWriter<CsvRowSink<W>, L>> {
        self.dialect.validate()?;
        Ok(RecordWriter::new(
            CsvRowSink::new(self.writer, &self.dialect),
            layout,
        ))
    }
}

/// Writes records one row at a time.
///
/// The header goes out before the first row, or at [`finish`](Self::finish)
/// if no row was written.
pub struct RecordWriter<S, L> {
    sink: S,
    layout: L,
    row: StringRecord,
    header_written: bool,
    encoded: u64,
}

impl<S: RowSink, L: Layout> RecordWriter<S, L> {
    /// Creates a writer; nothing is written yet.
    pub fn new(sink: S, layout: L) -> Self {
        Self {
            sink,
            layout,
            row: StringRecord::new(),
            header_written: false,
            encoded: 0,
        }
    }

    /// Writes the header row if it has not been written yet.
    ///
    /// # Errors
    ///
    /// Returns the sink's write error.
    pub fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }

        self.row.clear();
        for index in 0..self.layout.len() {
            self.row.push_field(self.layout.column(index).unwrap_or_default());
        }
        self.sink.write_row(&self.row).inspect_err(note_failure)?;
        self.header_written = true;

        tracing::debug!(
            record = self.layout.name(),
            columns = self.layout.len(),
            "Wrote header"
        );
        Ok(())
    }

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns the sink's write error.
    pub fn write(&mut self, value: &L::Row) -> Result<()> {
        self.write_header()?;
        self.layout.encode_row(value, &mut self.row);
        self.sink.write_row(&self.row).inspect_err(note_failure)?;
        self.encoded += 1;
        metrics::counter!("csvmap_rows_encoded_total").increment(1);
        Ok(())
    }

    /// Writes every record in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub fn write_all<'a, I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a L::Row>,
        L::Row: 'a,
    {
        values.into_iter().try_for_each(|value| self.write(value))
    }

    /// Number of records written so far.
    pub const fn rows_encoded(&self) -> u64 {
        self.encoded
    }

    /// Writes the header if needed, flushes, and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns the header write error or the flush error.
    pub fn finish(mut self) -> Result<S> {
        self.write_header()?;
        self.sink.finish().inspect_err(note_failure)?;
        tracing::debug!(
            record = self.layout.name(),
            rows = self.encoded,
            "Encode finished"
        );
        Ok(self.sink)
    }
}

fn note_failure(err: &Error) {
    tracing::debug!(error = %err, "Encode failed");
}
