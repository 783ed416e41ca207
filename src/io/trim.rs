//! Leading whitespace removal ahead of CSV framing.
//!
//! Blanks are dropped only where a field starts, outside quotes, so a
//! quoted field may follow its padding and whitespace inside quotes is
//! kept. The blanks are space, tab, vertical tab and form feed; a blank
//! equal to the delimiter is never dropped.

use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field: either the closing quote or the
    /// first half of an escaped one.
    QuoteInQuoted,
}

/// Reader that strips blanks at the start of every field.
///
/// Passes bytes through unchanged when disabled.
#[derive(Debug)]
pub(crate) struct LeadingSpace<R> {
    inner: R,
    delimiter: u8,
    enabled: bool,
    state: Scan,
}

impl<R: Read> LeadingSpace<R> {
    pub(crate) const fn new(inner: R, delimiter: u8, enabled: bool) -> Self {
        Self {
            inner,
            delimiter,
            enabled,
            state: Scan::FieldStart,
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }

    /// Advances the scanner by one byte; returns whether to keep it.
    const fn keep(&mut self, byte: u8) -> bool {
        let boundary = byte == self.delimiter || byte == b'\n' || byte == b'\r';
        self.state = match self.state {
            Scan::FieldStart if !boundary && is_blank(byte) => return false,
            Scan::FieldStart if byte == b'"' => Scan::Quoted,
            Scan::Quoted if byte == b'"' => Scan::QuoteInQuoted,
            Scan::Quoted => Scan::Quoted,
            Scan::QuoteInQuoted if byte == b'"' => Scan::Quoted,
            _ if boundary => Scan::FieldStart,
            _ => Scan::Unquoted,
        };
        true
    }
}

impl<R: Read> Read for LeadingSpace<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.enabled {
            return self.inner.read(buf);
        }

        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let mut kept = 0;
            for i in 0..n {
                let byte = buf[i];
                if self.keep(byte) {
                    buf[kept] = byte;
                    kept += 1;
                }
            }
            // A chunk of nothing but padding must not look like end of input.
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

const fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | 0x0B | 0x0C)
}
