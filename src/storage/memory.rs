// file: src/storage/memory.rs
// description: in-process object stores: a map-backed store and an always-failing one
// reference: https://doc.rust-lang.org/std/sync/struct.Mutex.html

use crate::error::{PipelineError, Result};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keeps every artifact in memory; `get` returns exactly what `put` stored.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(key).cloned())
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| PipelineError::RemotePersist(format!("Store lock poisoned: {}", e)))?;
        objects.insert(key.to_string(), body);
        Ok(())
    }

    fn location(&self) -> String {
        "memory://".to_string()
    }
}

/// Rejects every write, so each artifact lands in the fallback store.
#[derive(Debug, Clone)]
pub struct DisabledObjectStore {
    reason: String,
}

impl DisabledObjectStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for DisabledObjectStore {
    async fn put(&self, key: &str, _body: Vec<u8>) -> Result<()> {
        Err(PipelineError::RemotePersist(format!(
            "Remote store unavailable for {}: {}",
            key, self.reason
        )))
    }

    fn location(&self) -> String {
        format!("disabled ({})", self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryObjectStore::new();
        store.put("a.go.md", b"docs".to_vec()).await.unwrap();
        store.put("a.go.md", b"newer docs".to_vec()).await.unwrap();

        assert_eq!(store.get("a.go.md"), Some(b"newer docs".to_vec()));
        assert_eq!(store.get("a.go"), None);
        assert_eq!(store.keys(), vec!["a.go.md".to_string()]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_disabled_store_always_fails() {
        let store = DisabledObjectStore::new("no bucket configured");
        let err = tokio_test::block_on(store.put("a.go.md", b"docs".to_vec())).unwrap_err();

        assert!(matches!(err, PipelineError::RemotePersist(_)));
        assert!(err.to_string().contains("no bucket configured"));
        assert_eq!(store.location(), "disabled (no bucket configured)");
    }
}
