use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// Persistent store backed by a fjall keyspace partition under the
/// application data directory.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path, partition: &str) -> Result<Self> {
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(partition, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition: {partition}"))?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.partition.get(key) {
            Ok(value) => value.map(|v| v.to_vec()),
            Err(e) => {
                debug!(%key, error = %e, "Store read failed");
                None
            }
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) {
        let result = self
            .partition
            .insert(key, value)
            .and_then(|_| self.keyspace.persist(PersistMode::SyncAll));
        if let Err(e) = result {
            debug!(%key, error = %e, "Store write failed");
        }
    }
}
