/// Declares a struct and registers its members as CSV columns.
///
/// Every member becomes one column, in declaration order. The column name is
/// the member's identifier unless a `#[column = "..."]` attribute overrides it.
/// Member types must implement [`Field`](crate::Field); the struct must
/// implement `Default`, which supplies the value of columns missing from an
/// input header.
///
/// Members accept doc comments followed by an optional `#[column]` attribute.
///
/// ```rust
/// csvmap::record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Trade {
///         /// Exchange symbol.
///         #[column = "Symbol"]
///         pub symbol: String,
///         pub qty: u32,
///     }
/// }
///
/// let schema = csvmap::Schema::<Trade>::build()?;
/// assert_eq!(schema.column_names(), vec!["Symbol", "qty"]);
/// # Ok::<(), csvmap::Error>(())
/// ```
#[macro_export]
macro_rules! record {
    (@column $field:ident $column:literal) => {
        $column
    };
    (@column $field:ident) => {
        stringify!($field)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[column = $column:literal])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn describe(schema: &mut $crate::SchemaBuilder<Self>) {
                $(
                    schema.field::<$ty>(
                        $crate::record!(@column $field $($column)?),
                        |record| &mut record.$field,
                        |record| &record.$field,
                    );
                )*
            }
        }
    };
}
