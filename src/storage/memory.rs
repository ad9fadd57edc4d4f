//! In-process backend on a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{BackendError, StorageBackend};

/// Volatile backend with an optional byte capacity.
///
/// Capacity counts `key.len() + value.len()` over all entries; a write that
/// would exceed it fails with a quota error.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity_bytes(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: Some(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key() != key)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        if let Some(capacity) = self.capacity {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > capacity {
                return Err(BackendError::quota_exceeded(format!(
                    "capacity of {capacity} bytes reached ({needed} needed)"
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
