//! Record decoding.
//!
//! A decode call moves through three states: the header is read and
//! resolved when the [`RecordReader`] is opened, data rows are then
//! decoded one at a time, and the reader ends either exhausted or failed.
//! Both end states are absorbing.

use super::header::HeaderMapping;
use super::traits::{CsvRowSource, RowSource};
use super::Dialect;
use crate::schema::{DynamicRow, DynamicSchema, Layout, Record, Schema};
use crate::{Error, Result};
use csv::StringRecord;
use std::io::Read;
use std::sync::Arc;
use tracing::instrument;

/// Decodes delimited text into records.
///
/// Dialect setters apply to the next decode; the decoder is consumed by it.
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
/// let mut points: Vec<Point> = Vec::new();
/// csvmap::Decoder::new("y;x\n2;1\n".as_bytes())
///     .with_delimiter(b';')
///     .decode(&mut points)?;
/// assert_eq!((points[0].x, points[0].y), (1, 2));
/// # Ok::<(), csvmap::Error>(())
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    dialect: Dialect,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder with the default dialect.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
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

    /// Skips lines starting with `comment`.
    #[must_use]
    pub const fn with_comment(mut self, comment: u8) -> Self {
        self.dialect.comment = Some(comment);
        self
    }

    /// Enables or disables leading whitespace trimming.
    #[must_use]
    pub const fn with_trim_leading_space(mut self, trim: bool) -> Self {
        self.dialect.trim_leading_space = trim;
        self
    }

    /// Sets the field separator.
    pub const fn set_delimiter(&mut self, delimiter: u8) {
        self.dialect.delimiter = delimiter;
    }

    /// Sets or clears the comment byte.
    pub const fn set_comment(&mut self, comment: Option<u8>) {
        self.dialect.comment = comment;
    }

    /// Enables or disables leading whitespace trimming.
    pub const fn set_trim_leading_space(&mut self, trim: bool) {
        self.dialect.trim_leading_space = trim;
    }

    /// The dialect the next decode will use.
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Decodes every row into `out`, returning the number appended.
    ///
    /// Rows decoded before a failure stay in `out`.
    ///
    /// # Errors
    ///
    /// Returns the first schema, header, conversion or framing error.
    pub fn decode<T: Record>(self, out: &mut Vec<T>) -> Result<usize> {
        let schema = Schema::<T>::cached().inspect_err(note_failure)?;
        self.decode_with(schema, out)
    }

    /// Decodes every row into `out` using a runtime schema.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode`].
    pub fn decode_dynamic(self, schema: &DynamicSchema, out: &mut Vec<DynamicRow>) -> Result<usize> {
        self.decode_with(schema, out)
    }

    /// Decodes every row into `out` using any layout.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode`].
    pub fn decode_with<L: Layout>(self, layout: L, out: &mut Vec<L::Row>) -> Result<usize> {
        self.rows(layout)?.read_into(out)
    }

    /// Opens a row-by-row reader of typed records.
    ///
    /// # Errors
    ///
    /// Returns setup errors: an invalid dialect, a schema error, a missing
    /// or unresolvable header.
    pub fn records<T: Record>(self) -> Result<RecordReader<CsvRowSource<R>, Arc<Schema<T>>>> {
        let schema = Schema::<T>::cached().inspect_err(note_failure)?;
        self.rows(schema)
    }

    /// Opens a row-by-row reader for any layout.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::records`].
    pub fn rows<L: Layout>(self, layout: L) -> Result<RecordReader<CsvRowSource<R>, L>> {
        self.dialect.validate().inspect_err(note_failure)?;
        let source = CsvRowSource::new(self.reader, &self.dialect);
        RecordReader::new(source, layout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Rows,
    Done,
    Failed,
}

/// Reads records one row at a time.
///
/// Also an [`Iterator`] over `Result<Row>`; iteration stops after the
/// first error.
pub struct RecordReader<S, L> {
    source: S,
    layout: L,
    mapping: HeaderMapping,
    row: StringRecord,
    state: ReadState,
    decoded: u64,
}

impl<S: RowSource, L: Layout> RecordReader<S, L> {
    /// Reads the header from `source` and resolves it against `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] if the source is empty, a header
    /// resolution error, or the source's own read error.
    #[instrument(skip_all, fields(record = layout.name()))]
    pub fn new(mut source: S, layout: L) -> Result<Self> {
        let mut header = StringRecord::new();
        let opened = match source.read_row(&mut header) {
            Ok(true) => HeaderMapping::resolve(&layout, &header),
            Ok(false) => Err(Error::MissingHeader),
            Err(e) => Err(e),
        };
        let mapping = opened.inspect_err(note_failure)?;

        tracing::debug!(
            columns = layout.len(),
            header_columns = mapping.len(),
            "Resolved header"
        );

        Ok(Self {
            source,
            layout,
            mapping,
            row: header,
            state: ReadState::Rows,
            decoded: 0,
        })
    }

    /// Decodes the next row.
    ///
    /// Returns `Ok(None)` at end of input and after any earlier error.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or framing error of the row.
    pub fn next_record(&mut self) -> Result<Option<L::Row>> {
        if self.state != ReadState::Rows {
            return Ok(None);
        }

        match self.decode_next() {
            Ok(Some(record)) => {
                self.decoded += 1;
                metrics::counter!("csvmap_rows_decoded_total").increment(1);
                Ok(Some(record))
            },
            Ok(None) => {
                self.state = ReadState::Done;
                tracing::debug!(
                    record = self.layout.name(),
                    rows = self.decoded,
                    "Decode finished"
                );
                Ok(None)
            },
            Err(e) => {
                self.state = ReadState::Failed;
                note_failure(&e);
                Err(e)
            },
        }
    }

    fn decode_next(&mut self) -> Result<Option<L::Row>> {
        if !self.source.read_row(&mut self.row)? {
            return Ok(None);
        }

        if self.row.len() != self.mapping.len() {
            return Err(Error::FieldCount {
                line: self.row.position().map_or(0, csv::Position::line),
                expected: self.mapping.len(),
                found: self.row.len(),
            });
        }

        let mut record = self.layout.new_row();
        for ((_, index), text) in self.mapping.iter().zip(&self.row) {
            self.layout.decode_field(index, &mut record, text)?;
        }
        Ok(Some(record))
    }

    /// Appends every remaining record to `out`, returning the number appended.
    ///
    /// # Errors
    ///
    /// Returns the first error; records appended before it stay in `out`.
    pub fn read_into(&mut self, out: &mut Vec<L::Row>) -> Result<usize> {
        let mut appended = 0;
        while let Some(record) = self.next_record()? {
            out.push(record);
            appended += 1;
        }
        Ok(appended)
    }

    /// The header mapping of this decode.
    pub const fn mapping(&self) -> &HeaderMapping {
        &self.mapping
    }

    /// The layout rows are decoded with.
    pub const fn layout(&self) -> &L {
        &self.layout
    }

    /// Number of records decoded so far.
    pub const fn rows_decoded(&self) -> u64 {
        self.decoded
    }

    /// Consumes the reader, returning the row source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: RowSource, L: Layout> Iterator for RecordReader<S, L> {
    type Item = Result<L::Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn note_failure(err: &Error) {
    metrics::counter!("csvmap_decode_errors_total", "kind" => err.kind_label()).increment(1);
    tracing::debug!(error = %err, "Decode failed");
}
