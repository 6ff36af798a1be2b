//! Bounded, persisted list of past conversions

use std::sync::Arc;
use tracing::debug;

use crate::core::convert::ConversionRecord;
use crate::store::KeyValueStore;

const HISTORY_KEY: &str = "conversions";
const HISTORY_CAPACITY: usize = 10;

/// Conversion history, newest first. Capped at ten entries; the oldest is
/// dropped on overflow. Persisted as JSON under a fixed store key after
/// every successful conversion.
pub struct ConversionHistory {
    store: Arc<dyn KeyValueStore>,
}

impl ConversionHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Vec<ConversionRecord> {
        let Some(bytes) = self.store.get(HISTORY_KEY).await else {
            return Vec::new();
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                debug!(error = %e, "Discarding unreadable history");
                Vec::new()
            }
        }
    }

    pub async fn record(&self, record: ConversionRecord) {
        let mut records = self.load().await;
        records.insert(0, record);
        records.truncate(HISTORY_CAPACITY);

        match serde_json::to_vec(&records) {
            Ok(bytes) => self.store.put(HISTORY_KEY, bytes).await,
            Err(e) => debug!(error = %e, "Failed to serialize history"),
        }
    }
}
