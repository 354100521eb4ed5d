//! Table metadata cache.
//!
//! Metadata is fetched through a [`MetaDataLoader`] and kept per
//! `LIBRARY/NAME`. Entries are immutable: a reload replaces the cached
//! `Arc<MetaTable>`, so decoders holding the old value are unaffected.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::JournalError;
use crate::meta::{MetaTable, QualifiedName};
use crate::Result;

/// Source of table metadata, typically a host catalog query.
pub trait MetaDataLoader {
    /// Retrieve the column schema of `library/name` over `connection`.
    fn load(&self, connection: &str, library: &str, name: &str) -> Result<MetaTable>;
}

impl<F> MetaDataLoader for F
where
    F: Fn(&str, &str, &str) -> Result<MetaTable>,
{
    fn load(&self, connection: &str, library: &str, name: &str) -> Result<MetaTable> {
        self(connection, library, name)
    }
}

/// Cache of table metadata keyed by qualified name.
pub struct MetaDataCache<L> {
    loader: L,
    tables: HashMap<QualifiedName, Arc<MetaTable>>,
}

impl<L: MetaDataLoader> MetaDataCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            tables: HashMap::new(),
        }
    }

    /// Return cached metadata, loading it when missing or not loaded.
    ///
    /// A failed load leaves an unloaded placeholder so the next call retries.
    pub fn retrieve(&mut self, connection: &str, library: &str, name: &str) -> Result<Arc<MetaTable>> {
        let key = QualifiedName::new(library, name);
        if let Some(table) = self.tables.get(&key) {
            if table.loaded {
                return Ok(Arc::clone(table));
            }
            tracing::debug!(table = %key, "retrying metadata load");
        }

        match self.loader.load(connection, library, name) {
            Ok(mut table) => {
                table.loaded = true;
                let table = Arc::new(table);
                tracing::debug!(table = %key, columns = table.columns.len(), "metadata loaded");
                self.tables.insert(key, Arc::clone(&table));
                Ok(table)
            }
            Err(e) => {
                tracing::warn!(table = %key, error = %e, "metadata load failed");
                self.tables
                    .insert(key.clone(), Arc::new(MetaTable::pending(library, name)));
                Err(JournalError::MetadataLoad {
                    table: key,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Store metadata obtained elsewhere, replacing any cached value.
    pub fn save(&mut self, table: MetaTable) -> Arc<MetaTable> {
        let table = Arc::new(table);
        self.tables.insert(table.qualified_name(), Arc::clone(&table));
        table
    }

    /// Drop the cached metadata of `library/name`.
    pub fn invalidate(&mut self, library: &str, name: &str) -> Option<Arc<MetaTable>> {
        self.tables.remove(&QualifiedName::new(library, name))
    }

    pub fn cached_tables(&self) -> impl Iterator<Item = &Arc<MetaTable>> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{DataType, MetaColumn};
    use std::cell::Cell;

    struct CountingLoader {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl MetaDataLoader for CountingLoader {
        fn load(&self, _connection: &str, library: &str, name: &str) -> Result<MetaTable> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(JournalError::MetadataLoad {
                    table: QualifiedName::new(library, name),
                    message: "connection refused".to_string(),
                });
            }
            Ok(MetaTable::new(
                library,
                name,
                0,
                vec![MetaColumn::new("ID", DataType::Integer, 0, 0)],
            ))
        }
    }

    fn loader(fail: bool) -> CountingLoader {
        CountingLoader {
            calls: Cell::new(0),
            fail: Cell::new(fail),
        }
    }

    #[test]
    fn test_loads_once() {
        let mut cache = MetaDataCache::new(loader(false));
        let a = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap();
        let b = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.loader.calls.get(), 1);
    }

    #[test]
    fn test_failed_load_retries() {
        let mut cache = MetaDataCache::new(loader(true));
        let err = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap_err();
        assert!(matches!(err, JournalError::MetadataLoad { .. }));
        assert!(cache.cached_tables().all(|t| !t.loaded));

        cache.loader.fail.set(false);
        let table = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap();
        assert!(table.loaded);
        assert_eq!(cache.loader.calls.get(), 2);
    }

    #[test]
    fn test_reload_replaces_without_touching_old_value() {
        let mut cache = MetaDataCache::new(loader(false));
        let old = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap();
        assert!(cache.invalidate("APPLIB", "ORDERS").is_some());
        let new = cache.retrieve("SYS1", "APPLIB", "ORDERS").unwrap();
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(old.columns.len(), 1);
        assert_eq!(cache.loader.calls.get(), 2);
    }

    #[test]
    fn test_save_and_closure_loader() {
        let mut cache = MetaDataCache::new(|_: &str, l: &str, n: &str| -> Result<MetaTable> {
            Err(JournalError::MetadataLoad {
                table: QualifiedName::new(l, n),
                message: "offline".to_string(),
            })
        });
        cache.save(MetaTable::new("L", "T", 0, Vec::new()));
        assert!(cache.retrieve("SYS1", "L", "T").is_ok());
        assert!(cache.retrieve("SYS1", "L", "U").is_err());
        assert_eq!(cache.cached_tables().count(), 2);
    }
}
