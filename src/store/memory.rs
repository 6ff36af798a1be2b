use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store, used in tests and as a fallback when the data
/// directory is unavailable. Contents vanish at process exit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let store = self.inner.lock().await;
        let value = store.get(key).cloned();
        if value.is_some() {
            debug!(%key, "Store HIT");
        } else {
            debug!(%key, "Store MISS");
        }
        value
    }

    async fn put(&self, key: &str, value: Vec<u8>) {
        let mut store = self.inner.lock().await;
        debug!(%key, "Store PUT");
        store.insert(key.to_string(), value);
    }
}
