//! Durable and in-memory key-value backends

pub mod disk;
pub mod memory;

use async_trait::async_trait;

/// Minimal key-value surface the application persists through. Values are
/// opaque bytes; serialization is the caller's concern.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn put(&self, key: &str, value: Vec<u8>);
}
