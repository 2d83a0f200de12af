use crate::driver::{CollectionHandle, DatabaseHandle};
use crate::memory::MemoryCollection;
use dashmap::DashMap;
use std::sync::Arc;

/// A named set of in-memory collections. Clones share the same collections.
#[derive(Clone)]
pub struct MemoryDatabase {
    inner: Arc<MemoryDatabaseInner>,
}

struct MemoryDatabaseInner {
    name: String,
    collections: DashMap<String, MemoryCollection>,
}

impl MemoryDatabase {
    pub fn new(name: &str) -> Self {
        MemoryDatabase {
            inner: Arc::new(MemoryDatabaseInner {
                name: name.to_string(),
                collections: DashMap::new(),
            }),
        }
    }

    /// Returns the collection `name`, creating it when needed.
    pub fn memory_collection(&self, name: &str) -> MemoryCollection {
        self.inner
            .collections
            .entry(name.to_string())
            .or_insert_with(|| MemoryCollection::new(name))
            .value()
            .clone()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.contains_key(name)
    }

    pub fn drop_collection(&self, name: &str) {
        self.inner.collections.remove(name);
    }
}

impl DatabaseHandle for MemoryDatabase {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn collection(&self, name: &str) -> Arc<dyn CollectionHandle> {
        Arc::new(self.memory_collection(name))
    }
}
