//! Encoding scenarios: header emission, line endings, delimiters and
//! writer failures.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{Data, INPUT, expected};
use csvmap::{ColumnSpec, Decoder, DynamicSchema, Encoder, Error};
use std::io::{self, Write};

#[test]
fn test_encode_pass() {
    let out = csvmap::encode_all(&expected()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), INPUT);
}

#[test]
fn test_encode_crlf() {
    let out = Encoder::new(Vec::new())
        .with_crlf(true)
        .encode(&expected())
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), INPUT.replace('\n', "\r\n"));
}

#[test]
fn test_encode_no_crlf_after_toggle() {
    let mut encoder = Encoder::new(Vec::new()).with_crlf(true);
    encoder.set_crlf(false);
    let out = encoder.encode(&expected()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), INPUT);
}

#[test]
fn test_encode_custom_delimiter() {
    let out = Encoder::new(Vec::new())
        .with_delimiter(b';')
        .encode(&expected())
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), INPUT.replace(',', ";"));
}

#[test]
fn test_encode_empty_writes_header() {
    let out = csvmap::encode_all::<Data>(&[]).unwrap();
    assert_eq!(out, b"Foo,bar,Time,Custom\n");
}

#[test]
fn test_encode_quotes_when_needed() {
    let mut value = expected().remove(0);
    value.foo = "a,b \"c\"".to_string();
    let out = csvmap::encode_all(&[value.clone()]).unwrap();
    let text = String::from_utf8(out.clone()).unwrap();
    assert!(text.contains("\"a,b \"\"c\"\"\""));

    let back: Vec<Data> = csvmap::decode_all(out.as_slice()).unwrap();
    assert_eq!(back, vec![value]);
}

#[test]
fn test_encode_invalid_delimiter() {
    let err = Encoder::new(Vec::new())
        .with_delimiter(b'\r')
        .encode(&expected())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_streaming_writer() {
    let mut writer = Encoder::new(Vec::new()).records::<Data>().unwrap();
    for value in &expected() {
        writer.write(value).unwrap();
    }
    assert_eq!(writer.rows_encoded(), 2);
    let out = writer.finish().unwrap().into_inner().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), INPUT);
}

#[test]
fn test_round_trip_through_decoder() {
    let out = csvmap::encode_all(&expected()).unwrap();
    let mut back: Vec<Data> = Vec::new();
    Decoder::new(out.as_slice()).decode(&mut back).unwrap();
    assert_eq!(back, expected());
}

#[test]
fn test_encode_dynamic_rows() {
    let schema = DynamicSchema::new(
        "scores",
        &[ColumnSpec::new("name", "string"), ColumnSpec::new("score", "f32")],
    )
    .unwrap();
    let mut rows = Vec::new();
    Decoder::new("score,name\n2.5,ada\n".as_bytes())
        .decode_dynamic(&schema, &mut rows)
        .unwrap();

    let out = Encoder::new(Vec::new())
        .encode_dynamic(&schema, &rows)
        .unwrap();
    assert_eq!(out, b"name,score\nada,2.500000\n");
}

/// Accepts writes, fails every flush.
#[derive(Debug)]
struct FlushFails(Vec<u8>);

impl Write for FlushFails {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

/// Fails every write.
#[derive(Debug)]
struct WriteFails;

impl Write for WriteFails {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_flush_failure_surfaces() {
    let err = Encoder::new(FlushFails(Vec::new()))
        .encode(&expected())
        .unwrap_err();
    assert!(matches!(err, Error::Framing(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_write_failure_surfaces() {
    let err = Encoder::new(WriteFails).encode(&expected()).unwrap_err();
    assert!(matches!(err, Error::Framing(_)));
    assert!(err.to_string().contains("pipe closed"));
}

#[test]
fn test_leading_space_quoted_and_kept_by_trimming_decoder() {
    let mut value = expected().remove(0);
    value.foo = "  indented".to_string();
    let out = csvmap::encode_all(&[value.clone()]).unwrap();
    assert!(String::from_utf8(out.clone()).unwrap().contains("\n\"  indented\","));

    let mut back: Vec<Data> = Vec::new();
    Decoder::new(out.as_slice())
        .with_trim_leading_space(true)
        .decode(&mut back)
        .unwrap();
    assert_eq!(back, vec![value]);
}
