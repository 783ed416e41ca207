//! Record schemas.
//!
//! A [`Schema`] is the ordered list of columns of one record type: the
//! column name, the [`TypeKind`] and the accessors that move text in and
//! out of the member. Record types declare their columns through
//! [`Record::describe`], normally generated by the [`record!`](crate::record)
//! macro. A schema is validated once and never changes afterwards.
//!
//! [`DynamicSchema`] covers column lists only known at run time; both
//! implement [`Layout`], which is what the decoder and encoder consume.

mod cache;
mod dynamic;
mod kind;

pub use dynamic::{ColumnSpec, DynamicRow, DynamicSchema};
pub use kind::{Field, ScalarKind, TypeKind};

use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A struct whose members map to CSV columns.
///
/// `Default` supplies the starting value of every decoded row, so members
/// whose column is absent from the input keep their default.
pub trait Record: Default + 'static {
    /// Registers the record's columns, in declaration order.
    fn describe(schema: &mut SchemaBuilder<Self>);
}

/// An ordered set of named, typed columns and the row value they fill.
///
/// Implemented by typed [`Schema`]s and by [`DynamicSchema`].
pub trait Layout {
    /// The value built from one data row.
    type Row;

    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Number of columns.
    fn len(&self) -> usize;

    /// Returns whether the layout has no columns.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the column at `index`.
    fn column(&self, index: usize) -> Option<&str>;

    /// Kind of the column at `index`.
    fn kind(&self, index: usize) -> Option<TypeKind>;

    /// Returns a fresh row with every column at its zero value.
    fn new_row(&self) -> Self::Row;

    /// Decodes `text` into the column at `index` of `row`.
    fn decode_field(&self, index: usize, row: &mut Self::Row, text: &str) -> Result<()>;

    /// Encodes every column of `row`, in order, into `out`.
    fn encode_row(&self, row: &Self::Row, out: &mut StringRecord);

    /// Position of the first column named `name`.
    fn position(&self, name: &str) -> Option<usize> {
        (0..self.len()).find(|&index| self.column(index) == Some(name))
    }
}

impl<L: Layout + ?Sized> Layout for &L {
    type Row = L::Row;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn column(&self, index: usize) -> Option<&str> {
        (**self).column(index)
    }

    fn kind(&self, index: usize) -> Option<TypeKind> {
        (**self).kind(index)
    }

    fn new_row(&self) -> Self::Row {
        (**self).new_row()
    }

    fn decode_field(&self, index: usize, row: &mut Self::Row, text: &str) -> Result<()> {
        (**self).decode_field(index, row, text)
    }

    fn encode_row(&self, row: &Self::Row, out: &mut StringRecord) {
        (**self).encode_row(row, out);
    }
}

impl<L: Layout + ?Sized> Layout for Arc<L> {
    type Row = L::Row;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn column(&self, index: usize) -> Option<&str> {
        (**self).column(index)
    }

    fn kind(&self, index: usize) -> Option<TypeKind> {
        (**self).kind(index)
    }

    fn new_row(&self) -> Self::Row {
        (**self).new_row()
    }

    fn decode_field(&self, index: usize, row: &mut Self::Row, text: &str) -> Result<()> {
        (**self).decode_field(index, row, text)
    }

    fn encode_row(&self, row: &Self::Row, out: &mut StringRecord) {
        (**self).encode_row(row, out);
    }
}

type DecodeFn<R> = Box<dyn Fn(&mut R, &str) -> Result<()> + Send + Sync>;
type EncodeFn<R> = Box<dyn Fn(&R) -> String + Send + Sync>;

/// One column of a typed schema.
pub struct FieldDef<R> {
    column: String,
    kind: TypeKind,
    decode: DecodeFn<R>,
    encode: EncodeFn<R>,
}

impl<R> FieldDef<R> {
    /// Column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Classification of the member's type.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }
}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Collects the columns of a record type.
///
/// Passed to [`Record::describe`]; finished by [`Schema::build`].
pub struct SchemaBuilder<R> {
    fields: Vec<FieldDef<R>>,
}

impl<R: 'static> SchemaBuilder<R> {
    const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Registers a member as the next column.
    ///
    /// `get_mut` and `get` project the member out of the record; the
    /// member's [`Field`] impl decides its [`TypeKind`].
    pub fn field<T: Field + 'static>(
        &mut self,
        column: impl Into<String>,
        get_mut: fn(&mut R) -> &mut T,
        get: fn(&R) -> &T,
    ) -> &mut Self {
        self.fields.push(FieldDef {
            column: column.into(),
            kind: T::kind(),
            decode: Box::new(move |record, text| get_mut(record).decode_field(text)),
            encode: Box::new(move |record| get(record).encode_field()),
        });
        self
    }

    fn finish(self, record: &'static str) -> Result<Schema<R>> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.column.is_empty() {
                return Err(Error::Schema {
                    record: record.to_string(),
                    reason: "column name is empty".to_string(),
                });
            }
            if !seen.insert(field.column.as_str()) {
                return Err(Error::Schema {
                    record: record.to_string(),
                    reason: format!("column '{}' is declared twice", field.column),
                });
            }
        }

        Ok(Schema {
            record,
            fields: self.fields,
        })
    }
}

/// The validated column list of a record type.
pub struct Schema<R> {
    record: &'static str,
    fields: Vec<FieldDef<R>>,
}

impl<R: Record> Schema<R> {
    /// Builds the schema of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a column name is empty or declared twice.
    pub fn build() -> Result<Self> {
        let mut builder = SchemaBuilder::new();
        R::describe(&mut builder);
        builder.finish(short_type_name::<R>())
    }

    /// Returns the shared schema of `R`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Schema::build`]; failed builds are not
    /// cached.
    pub fn cached() -> Result<Arc<Self>> {
        cache::get_or_build::<R>()
    }
}

impl<R> Schema<R> {
    /// Name of the record type.
    #[must_use]
    pub const fn record_name(&self) -> &'static str {
        self.record
    }

    /// The columns, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef<R>] {
        &self.fields
    }

    /// The column names, in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldDef::column).collect()
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("record", &self.record)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R: Record> Layout for Schema<R> {
    type Row = R;

    fn name(&self) -> &str {
        self.record
    }

    fn len(&self) -> usize {
        self.fields.len()
    }

    fn column(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(FieldDef::column)
    }

    fn kind(&self, index: usize) -> Option<TypeKind> {
        self.fields.get(index).map(FieldDef::kind)
    }

    fn new_row(&self) -> R {
        R::default()
    }

    fn decode_field(&self, index: usize, row: &mut R, text: &str) -> Result<()> {
        let field = self
            .fields
            .get(index)
            .ok_or_else(|| Error::InvalidInput(format!("{} has no column {index}", self.record)))?;
        (field.decode)(row, text)
    }

    fn encode_row(&self, row: &R, out: &mut StringRecord) {
        out.clear();
        for field in &self.fields {
            out.push_field(&(field.encode)(row));
        }
    }
}

/// Type name without its module path.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
