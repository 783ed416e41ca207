//! Property-based tests for the row mapping.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Encoding then decoding a batch yields the same records
//! - Header column order does not change decoded values
//! - Integer boundaries survive the text form
//! - Fixed-point float text decodes back to the rounded value

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use csvmap::{ColumnSpec, Decoder, DynamicSchema, Encoder, ScalarKind, Value};
use proptest::prelude::*;

csvmap::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Row {
        #[column = "Name"]
        name: String,
        count: i32,
        flag: bool,
        #[column = "Total"]
        total: u64,
    }
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (any::<String>(), any::<i32>(), any::<bool>(), any::<u64>()).prop_map(
        |(name, count, flag, total)| Row {
            name,
            count,
            flag,
            total,
        },
    )
}

fn render(header: &[&str], rows: &[Row]) -> String {
    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = header
            .iter()
            .map(|column| match *column {
                "Name" => format!("\"{}\"", row.name.replace('"', "\"\"")),
                "count" => row.count.to_string(),
                "flag" => row.flag.to_string(),
                _ => row.total.to_string(),
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

proptest! {
    /// Property: decode(encode(batch)) == batch for any strings, including
    /// quotes, delimiters and line breaks.
    #[test]
    fn prop_round_trip(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let out = csvmap::encode_all(&rows).unwrap();
        let back: Vec<Row> = csvmap::decode_all(out.as_slice()).unwrap();
        prop_assert_eq!(back, rows);
    }

    /// Property: the round trip holds under any legal delimiter.
    #[test]
    fn prop_round_trip_any_delimiter(
        rows in prop::collection::vec(row_strategy(), 1..5),
        delimiter in prop::sample::select(vec![b';', b'\t', b'|', b'~', b':']),
    ) {
        let out = Encoder::new(Vec::new())
            .with_delimiter(delimiter)
            .encode(&rows)
            .unwrap();
        let mut back: Vec<Row> = Vec::new();
        Decoder::new(out.as_slice())
            .with_delimiter(delimiter)
            .decode(&mut back)
            .unwrap();
        prop_assert_eq!(back, rows);
    }

    /// Property: any permutation of the header decodes to the same records.
    #[test]
    fn prop_header_order_irrelevant(
        rows in prop::collection::vec(row_strategy(), 1..5),
        order in Just(vec!["Name", "count", "flag", "Total"]).prop_shuffle(),
    ) {
        let input = render(&order, &rows);
        let back: Vec<Row> = csvmap::decode_all(input.as_bytes()).unwrap();
        prop_assert_eq!(back, rows);
    }

    /// Property: every i64 survives the runtime schema path unchanged.
    #[test]
    fn prop_dynamic_i64_exact(value in any::<i64>()) {
        let schema = DynamicSchema::from_columns(
            "ints",
            [("n".to_string(), ScalarKind::I64)],
        ).unwrap();
        let input = format!("n\n{value}\n");
        let mut rows = Vec::new();
        Decoder::new(input.as_bytes()).decode_dynamic(&schema, &mut rows).unwrap();
        prop_assert_eq!(rows[0].values(), &[Value::I64(value)]);
    }

    /// Property: one past the u32 range is always a range failure.
    #[test]
    fn prop_u32_overflow_rejected(excess in 1u64..1_000_000) {
        let schema = DynamicSchema::new("wide", &[ColumnSpec::new("n", "u32")]).unwrap();
        let input = format!("n\n{}\n", u64::from(u32::MAX) + excess);
        let err = Decoder::new(input.as_bytes())
            .decode_dynamic(&schema, &mut Vec::new())
            .unwrap_err();
        prop_assert!(matches!(
            err,
            csvmap::Error::Conversion(ref e) if e.failure == csvmap::ConversionFailure::Range
        ));
    }

    /// Property: f64 text carries fifteen decimals and decodes to a value
    /// within half a unit of the last place.
    #[test]
    fn prop_f64_fixed_point(value in -1.0e6f64..1.0e6) {
        let text = csvmap::codec::format_f64(value);
        let decimals = text.split_once('.').map(|(_, d)| d.len());
        prop_assert_eq!(decimals, Some(15));
        let back = csvmap::codec::parse_f64(&text).unwrap();
        prop_assert!((back - value).abs() <= 5.0e-16 * value.abs().max(1.0) + 5.0e-16);
    }
}
