//! Delimited-text dialect settings.

use crate::{Error, Result};

/// How rows are framed in the text.
///
/// | Setting | Default | Applies to |
/// |---------|---------|------------|
/// | `delimiter` | `,` | decode and encode |
/// | `comment` | none | decode |
/// | `trim_leading_space` | `false` | decode |
/// | `crlf` | `false` | encode |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field separator.
    pub delimiter: u8,
    /// Lines starting with this byte are skipped when reading.
    pub comment: Option<u8>,
    /// Strip leading whitespace from every field read, header included.
    pub trim_leading_space: bool,
    /// Terminate written rows with `\r\n` instead of `\n`.
    pub crlf: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: None,
            trim_leading_space: false,
            crlf: false,
        }
    }
}

impl Dialect {
    /// Sets the field separator.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the comment byte.
    #[must_use]
    pub const fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Enables or disables leading whitespace trimming.
    #[must_use]
    pub const fn with_trim_leading_space(mut self, trim: bool) -> Self {
        self.trim_leading_space = trim;
        self
    }

    /// Selects `\r\n` or `\n` row terminators.
    #[must_use]
    pub const fn with_crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    /// Checks that the delimiter and comment bytes can frame rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either byte is a quote, a line
    /// break or NUL, or if the comment byte equals the delimiter.
    pub fn validate(&self) -> Result<()> {
        let reserved = |byte: u8| matches!(byte, b'\r' | b'\n' | b'"' | 0);
        let comment_clash = self
            .comment
            .is_some_and(|c| reserved(c) || c == self.delimiter);

        if reserved(self.delimiter) || comment_clash {
            return Err(Error::InvalidInput(
                "invalid field or comment delimiter".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a reader builder for this dialect.
    ///
    /// The header is read as an ordinary row. Rows may vary in length here;
    /// the decoder checks each one against the header.
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .comment(self.comment);
        builder
    }

    /// Returns a writer builder for this dialect.
    ///
    /// Fields arrive already quoted; see [`CsvRowSink`](super::CsvRowSink).
    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let terminator = if self.crlf {
            csv::Terminator::CRLF
        } else {
            csv::Terminator::Any(b'\n')
        };
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(false)
            .delimiter(self.delimiter)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(terminator);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_dialect() {
        let dialect = Dialect::default();
        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.comment, None);
        assert!(!dialect.trim_leading_space);
        assert!(!dialect.crlf);
        assert!(dialect.validate().is_ok());
    }

    #[test_case(b'\r' ; "carriage return")]
    #[test_case(b'\n' ; "line feed")]
    #[test_case(b'"' ; "quote")]
    #[test_case(0 ; "nul")]
    fn test_reserved_delimiter_rejected(byte: u8) {
        let err = Dialect::default().with_delimiter(byte).validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid input: invalid field or comment delimiter");
    }

    #[test]
    fn test_comment_equal_to_delimiter_rejected() {
        let dialect = Dialect::default().with_delimiter(b';').with_comment(Some(b';'));
        assert!(dialect.validate().is_err());
        assert!(dialect.with_comment(Some(b'#')).validate().is_ok());
    }

    #[test]
    fn test_tab_and_tilde_accepted() {
        assert!(Dialect::default().with_delimiter(b'\t').validate().is_ok());
        assert!(Dialect::default().with_delimiter(b'~').validate().is_ok());
    }
}
