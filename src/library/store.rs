//! Opaque key-value store contract and the in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::LibraryError;

/// The persistence contract the library depends on.
///
/// Matches what any key-value or relational store can offer: point
/// get/set/delete plus prefix listing. Implementations wrap their native
/// errors into [`LibraryError::Store`].
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, LibraryError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), LibraryError>;
    async fn delete(&self, key: &str) -> Result<(), LibraryError>;

    /// Keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, LibraryError>;
}

/// In-memory store for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), LibraryError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, LibraryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let store = MemoryStore::new();
        store.set("item:1", "{}").await.unwrap();
        assert_eq!(store.get("item:1").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get("item:2").await.unwrap(), None);
        assert_eq!(store.len(), 1);

        store.delete("item:1").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_listing() {
        let store = MemoryStore::new();
        store.set("folder:a", "{}").await.unwrap();
        store.set("item:b", "{}").await.unwrap();
        store.set("item:c", "{}").await.unwrap();

        let mut keys = store.keys("item:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["item:b", "item:c"]);
    }
}
