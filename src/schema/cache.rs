//! Process-wide schema cache keyed by record type.

use super::{Record, Schema};
use crate::{Error, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

type Entry = Arc<dyn Any + Send + Sync>;

static SCHEMAS: LazyLock<RwLock<HashMap<TypeId, Entry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Returns the cached schema of `R`, building and storing it if absent.
///
/// Two threads racing on the first use may both build; the first insert wins
/// and both receive the same `Arc`.
pub(super) fn get_or_build<R: Record>() -> Result<Arc<Schema<R>>> {
    let key = TypeId::of::<R>();

    if let Some(entry) = lookup(key) {
        return downcast(entry);
    }

    let built: Entry = Arc::new(Schema::<R>::build()?);
    let entry = {
        let mut schemas = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(schemas.entry(key).or_insert(built))
    };

    tracing::debug!(record = std::any::type_name::<R>(), "Cached record schema");
    downcast(entry)
}

fn lookup(key: TypeId) -> Option<Entry> {
    let schemas = SCHEMAS.read().unwrap_or_else(PoisonError::into_inner);
    schemas.get(&key).cloned()
}

fn downcast<R: Record>(entry: Entry) -> Result<Arc<Schema<R>>> {
    entry
        .downcast::<Schema<R>>()
        .map_err(|_| Error::OperationFailed {
            operation: "schema_cache".to_string(),
            cause: format!("entry for {} has a foreign type", std::any::type_name::<R>()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Cached {
            a: i32,
            b: String,
        }
    }

    #[test]
    fn test_cache_returns_same_schema() {
        let first = Schema::<Cached>::cached().unwrap();
        let second = Schema::<Cached>::cached().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_cache_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Schema::<Cached>::cached().unwrap()))
            .collect();
        let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for schema in &schemas[1..] {
            assert!(Arc::ptr_eq(&schemas[0], schema));
        }
    }
}
