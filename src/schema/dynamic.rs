//! Column lists declared at run time.

use super::{Layout, ScalarKind, TypeKind};
use crate::codec::{self, Value};
use crate::{Error, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One column of a runtime schema, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Kind name, e.g. `i64` or `timestamp`.
    pub kind: String,
}

impl ColumnSpec {
    /// Creates a column spec.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// A decoded row of a [`DynamicSchema`], one value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DynamicRow(pub Vec<Value>);

impl DynamicRow {
    /// Value of the column at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All values, in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

/// A schema whose columns are only known at run time.
///
/// Only built-in kinds are available; custom conversions need a typed
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSchema {
    name: String,
    columns: Vec<(String, ScalarKind)>,
}

impl DynamicSchema {
    /// Builds a schema from column specs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a kind name is unknown, or a column name
    /// is empty or repeated.
    pub fn new(name: impl Into<String>, specs: &[ColumnSpec]) -> Result<Self> {
        let name = name.into();
        let columns = specs
            .iter()
            .map(|spec| {
                ScalarKind::parse(&spec.kind)
                    .map(|kind| (spec.name.clone(), kind))
                    .ok_or_else(|| Error::Schema {
                        record: name.clone(),
                        reason: format!(
                            "column '{}' has unsupported type '{}'",
                            spec.name, spec.kind
                        ),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(name, columns)
    }

    /// Builds a schema from already classified columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a column name is empty or repeated.
    pub fn from_columns(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (String, ScalarKind)>,
    ) -> Result<Self> {
        let name = name.into();
        let columns: Vec<_> = columns.into_iter().collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for (column, _) in &columns {
            if column.is_empty() {
                return Err(Error::Schema {
                    record: name,
                    reason: "column name is empty".to_string(),
                });
            }
            if !seen.insert(column.as_str()) {
                return Err(Error::Schema {
                    reason: format!("column '{column}' is declared twice"),
                    record: name,
                });
            }
        }

        Ok(Self { name, columns })
    }

    /// The column names, in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Converts a row into a JSON object keyed by column name.
    #[must_use]
    pub fn to_json(&self, row: &DynamicRow) -> serde_json::Value {
        let object = self
            .columns
            .iter()
            .zip(row.values())
            .map(|((name, _), value)| {
                (
                    name.clone(),
                    serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        serde_json::Value::Object(object)
    }
}

impl Layout for DynamicSchema {
    type Row = DynamicRow;

    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.columns.len()
    }

    fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|(name, _)| name.as_str())
    }

    fn kind(&self, index: usize) -> Option<TypeKind> {
        self.columns
            .get(index)
            .map(|(_, kind)| TypeKind::Scalar(*kind))
    }

    fn new_row(&self) -> DynamicRow {
        DynamicRow(
            self.columns
                .iter()
                .map(|(_, kind)| Value::zero(*kind))
                .collect(),
        )
    }

    fn decode_field(&self, index: usize, row: &mut DynamicRow, text: &str) -> Result<()> {
        let (Some((_, kind)), Some(slot)) = (self.columns.get(index), row.0.get_mut(index)) else {
            return Err(Error::InvalidInput(format!(
                "{} has no column {index}",
                self.name
            )));
        };
        *slot = codec::decode_scalar(*kind, text)?;
        Ok(())
    }

    fn encode_row(&self, row: &DynamicRow, out: &mut StringRecord) {
        out.clear();
        for value in row.values() {
            out.push_field(&value.encode());
        }
    }
}
