//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use csvmap::{Error, Field};

csvmap::record! {
    /// Record covering renamed, timestamp and custom columns.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Data {
        #[column = "Foo"]
        pub foo: String,
        pub bar: i64,
        #[column = "Time"]
        pub time: DateTime<FixedOffset>,
        #[column = "Custom"]
        pub custom: Custom,
    }
}

/// Custom column stored as `a|b`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Custom {
    pub a: String,
    pub b: i64,
}

impl Field for Custom {
    fn decode_field(&mut self, text: &str) -> csvmap::Result<()> {
        let parts: Vec<&str> = text.split('|').collect();
        let [a, b] = parts.as_slice() else {
            return Err(Error::custom("invalid data for custom decode"));
        };
        self.a = (*a).to_string();
        self.b = b.parse().map_err(Error::custom)?;
        Ok(())
    }

    fn encode_field(&self) -> String {
        format!("{}|{}", self.a, self.b)
    }
}

pub const INPUT: &str = "Foo,bar,Time,Custom
hello world,9223372036854775807,2006-01-02T15:04:05-07:00,value1|1
goodbye world,-9223372036854775808,2020-07-03T16:39:44+01:00,value2|2
";

pub fn ts(text: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(text).unwrap()
}

pub fn expected() -> Vec<Data> {
    vec![
        Data {
            foo: "hello world".to_string(),
            bar: i64::MAX,
            time: ts("2006-01-02T15:04:05-07:00"),
            custom: Custom {
                a: "value1".to_string(),
                b: 1,
            },
        },
        Data {
            foo: "goodbye world".to_string(),
            bar: i64::MIN,
            time: ts("2020-07-03T16:39:44+01:00"),
            custom: Custom {
                a: "value2".to_string(),
                b: 2,
            },
        },
    ]
}
