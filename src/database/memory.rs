use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::traits::{DocumentStorage, RawDocument};

/// Slots kept in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<BTreeMap<String, RawDocument>>,
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn load(&self, slot: &str) -> Result<Option<RawDocument>> {
        Ok(self.slots.lock().await.get(slot).cloned())
    }

    async fn save(&self, slot: &str, version: i64, data: &str) -> Result<()> {
        self.slots.lock().await.insert(
            slot.to_string(),
            RawDocument {
                version,
                data: data.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, slot: &str) -> Result<bool> {
        Ok(self.slots.lock().await.remove(slot).is_some())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .slots
            .lock()
            .await
            .keys()
            .filter(|slot| slot.starts_with(prefix))
            .cloned()
            .collect())
    }
}
