//! Row-level seams between the record codec and the text framing.
//!
//! The decoder pulls raw rows from a [`RowSource`] and the encoder pushes
//! raw rows into a [`RowSink`]. The csv-crate backed [`CsvRowSource`] and
//! [`CsvRowSink`] are what [`Decoder`](super::Decoder) and
//! [`Encoder`](super::Encoder) use; other implementations can feed rows
//! from anywhere.

use super::Dialect;
use super::trim::LeadingSpace;
use crate::Result;
use csv::StringRecord;
use std::borrow::Cow;
use std::io::{Read, Write};

/// Source of raw rows.
///
/// The first row read is the header.
///
/// # Example Implementation
///
/// ```rust
/// use csv::StringRecord;
/// use csvmap::RowSource;
///
/// struct Fixed(std::vec::IntoIter<Vec<&'static str>>);
///
/// impl RowSource for Fixed {
///     fn read_row(&mut self, row: &mut StringRecord) -> csvmap::Result<bool> {
///         Ok(self.0.next().is_some_and(|fields| {
///             *row = StringRecord::from(fields);
///             true
///         }))
///     }
/// }
/// ```
pub trait RowSource {
    /// Reads the next row into `row`.
    ///
    /// Returns `Ok(false)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`](crate::Error::Framing) if the row is
    /// malformed or the underlying reader fails.
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool> {
        (**self).read_row(row)
    }
}

/// Sink for raw rows.
///
/// # Lifecycle
///
/// 1. Call `write_row()` for the header and then each data row
/// 2. Call `finish()` once to flush buffered output
pub trait RowSink {
    /// Writes one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn write_row(&mut self, row: &StringRecord) -> Result<()>;

    /// Flushes everything written so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn finish(&mut self) -> Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, row: &StringRecord) -> Result<()> {
        (**self).write_row(row)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Reads rows with the `csv` crate.
///
/// With `trim_leading_space` set, blanks at the start of each field are
/// removed before framing, so quoting and quoted content are unaffected.
pub struct CsvRowSource<R> {
    reader: csv::Reader<LeadingSpace<R>>,
}

impl<R: Read> CsvRowSource<R> {
    /// Creates a row source for the given dialect.
    ///
    /// The dialect is not validated here; [`Decoder`](super::Decoder) does
    /// that before any row is read.
    pub fn new(reader: R, dialect: &Dialect) -> Self {
        let reader = LeadingSpace::new(reader, dialect.delimiter, dialect.trim_leading_space);
        Self {
            reader: dialect.reader_builder().from_reader(reader),
        }
    }

    /// Consumes the source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner().into_inner()
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool> {
        Ok(self.reader.read_record(row)?)
    }
}

/// Writes rows with the `csv` crate.
///
/// A field is quoted when it contains the delimiter, a quote, `\r` or
/// `\n`, when it starts with whitespace (so trimming readers keep the
/// padding), when it is `\.`, and when it is the only, empty, field of
/// its row.
pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
    delimiter: u8,
}

impl<W: Write> CsvRowSink<W> {
    /// Creates a row sink for the given dialect.
    pub fn new(writer: W, dialect: &Dialect) -> Self {
        Self {
            writer: dialect.writer_builder().from_writer(writer),
            delimiter: dialect.delimiter,
        }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::from(e.into_error()))
    }
}

fn quote_field(field: &str, delimiter: u8, only_field: bool) -> Cow<'_, [u8]> {
    let needs_quotes = if field.is_empty() {
        only_field
    } else {
        field == "\\."
            || field
                .bytes()
                .any(|b| b == delimiter || matches!(b, b'"' | b'\r' | b'\n'))
            || field.starts_with(char::is_whitespace)
    };
    if !needs_quotes {
        return Cow::Borrowed(field.as_bytes());
    }

    let mut quoted = Vec::with_capacity(field.len() + 2);
    quoted.push(b'"');
    for &b in field.as_bytes() {
        if b == b'"' {
            quoted.push(b'"');
        }
        quoted.push(b);
    }
    quoted.push(b'"');
    Cow::Owned(quoted)
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write_row(&mut self, row: &StringRecord) -> Result<()> {
        let delimiter = self.delimiter;
        let only_field = row.len() == 1;
        self.writer
            .write_record(row.iter().map(|field| quote_field(field, delimiter, only_field)))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str, dialect: &Dialect) -> Vec<Vec<String>> {
        let mut source = CsvRowSource::new(input.as_bytes(), dialect);
        let mut row = StringRecord::new();
        let mut rows = Vec::new();
        while source.read_row(&mut row).unwrap() {
            rows.push(row.iter().map(String::from).collect());
        }
        rows
    }

    #[test]
    fn test_trim_leading_space_keeps_trailing() {
        let dialect = Dialect::default().with_trim_leading_space(true);
        let rows = read_all("  a,\tb \nc,  d\n", &dialect);
        assert_eq!(rows, vec![vec!["a", "b "], vec!["c", "d"]]);
    }

    #[test]
    fn test_without_trim_fields_are_verbatim() {
        let rows = read_all("  a, b\n", &Dialect::default());
        assert_eq!(rows, vec![vec!["  a", " b"]]);
    }

    #[test]
    fn test_trimmed_rows_keep_position() {
        let dialect = Dialect::default().with_trim_leading_space(true);
        let mut source = CsvRowSource::new("h\n v\n".as_bytes(), &dialect);
        let mut row = StringRecord::new();
        assert!(source.read_row(&mut row).unwrap());
        assert!(source.read_row(&mut row).unwrap());
        assert_eq!(row.position().map(csv::Position::line), Some(2));
    }

    #[test]
    fn test_trim_keeps_quoted_fields_intact() {
        let dialect = Dialect::default().with_trim_leading_space(true);
        let rows = read_all("a,b\n1,  \"x,y\"\n2,\"  z\"\n", &dialect);
        assert_eq!(rows, vec![
            vec!["a", "b"],
            vec!["1", "x,y"],
            vec!["2", "  z"]
        ]);
    }

    #[test]
    fn test_comment_lines_skipped() {
        let dialect = Dialect::default().with_comment(Some(b'#'));
        let rows = read_all("a\n# note\nb\n", &dialect);
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    fn write_all(rows: &[&[&str]]) -> String {
        let mut sink = CsvRowSink::new(Vec::new(), &Dialect::default());
        for row in rows {
            sink.write_row(&StringRecord::from(row.to_vec())).unwrap();
        }
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_sink_quotes_only_when_needed() {
        assert_eq!(write_all(&[&["plain", "a b", "1.5"]]), "plain,a b,1.5\n");
        assert_eq!(
            write_all(&[&["a,b", "say \"hi\"", "two\nlines"]]),
            "\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\"\n"
        );
    }

    #[test]
    fn test_sink_quotes_leading_whitespace() {
        assert_eq!(write_all(&[&[" lead", "trail ", "\ttab"]]), "\" lead\",trail ,\"\ttab\"\n");
    }

    #[test]
    fn test_sink_quotes_special_fields() {
        assert_eq!(write_all(&[&["\\."], &[""], &["", ""]]), "\"\\.\"\n\"\"\n,\n");
    }

    #[test]
    fn test_leading_space_survives_trimming_reader() {
        let out = write_all(&[&["a", "b"], &[" lead", "  x"]]);
        let dialect = Dialect::default().with_trim_leading_space(true);
        let rows = read_all(&out, &dialect);
        assert_eq!(rows[1], vec![" lead", "  x"]);
    }

    #[test]
    fn test_sink_terminators() {
        let mut sink = CsvRowSink::new(Vec::new(), &Dialect::default().with_crlf(true));
        sink.write_row(&StringRecord::from(vec!["a", "b"])).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"a,b\r\n");

        let mut sink = CsvRowSink::new(Vec::new(), &Dialect::default().with_delimiter(b'\t'));
        sink.write_row(&StringRecord::from(vec!["a", "b"])).unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"a\tb\n");
    }
}
