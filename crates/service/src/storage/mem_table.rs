use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::errors::ServiceError;

/// Generic in-memory, insertion-ordered table keyed by a string.
///
/// Mutations go through the write lock, so create/update are serialized and
/// a partial update can never interleave with another writer on the same
/// record. Listing and dumping return records in insertion order. Store
/// lifetime equals process lifetime; nothing is persisted.
#[derive(Clone)]
pub struct MemTable<V> {
    inner: Arc<RwLock<IndexMap<String, V>>>,
}

impl<V> MemTable<V>
where
    V: Clone,
{
    pub fn new() -> Arc<Self> {
        Self::with_entries([])
    }

    /// Initialize the table with pre-populated entries.
    pub fn with_entries<I>(entries: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let map: IndexMap<String, V> = entries.into_iter().collect();
        Arc::new(Self { inner: Arc::new(RwLock::new(map)) })
    }

    /// Get a value by key.
    pub async fn get(&self, key: &str) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// All values in insertion order.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// First value satisfying the predicate, scanning in insertion order.
    pub async fn find_value<F>(&self, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().find(|v| pred(v)).cloned()
    }

    /// Apply a mutation to the underlying map under the write lock.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut IndexMap<String, V>) -> Result<(), ServiceError>,
    {
        let mut map = self.inner.write().await;
        f(&mut map)
    }

    /// Full table contents, keyed by primary lookup key, in insertion order.
    pub async fn dump(&self) -> IndexMap<String, V> {
        let map = self.inner.read().await;
        map.clone()
    }
}
