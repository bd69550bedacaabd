//! Storage-agnostic persistence of document slots

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One stored slot as it sits in the backend: the schema version it was
/// written with and the serialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub version: i64,
    pub data: String,
    pub updated_at: DateTime<Utc>,
}

/// Trait for durable key-value slot storage
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Read a slot.
    ///
    /// # Returns
    /// * `Result<Option<RawDocument>>` - The stored row, `None` if the slot was never written
    async fn load(&self, slot: &str) -> Result<Option<RawDocument>>;

    /// Write a slot, replacing whatever it held.
    async fn save(&self, slot: &str, version: i64, data: &str) -> Result<()>;

    /// Remove a slot.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the slot existed
    async fn delete(&self, slot: &str) -> Result<bool>;

    /// Names of all slots starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
