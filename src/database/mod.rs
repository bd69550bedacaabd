//! Document slots: the current message and named backups, versioned and
//! serialized in the editor wire format.

mod memory;

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, Sqlite, SqlitePool, migrate::MigrateDatabase};
use thiserror::Error;
use tracing::{info, warn};

use crate::discord::{self, Format};
use crate::models::Message;
use crate::templates::default_message;
use crate::traits::{DocumentStorage, RawDocument};

pub use memory::MemoryStorage;

/// Bumped whenever the stored shape changes; rows of any other version are
/// ignored on load.
pub const SCHEMA_VERSION: i64 = 1;

pub const CURRENT_SLOT: &str = "current-message";
pub const BACKUP_PREFIX: &str = "backup:";

pub fn backup_slot(name: &str) -> String {
    format!("{BACKUP_PREFIX}{name}")
}

/// Why a stored row could not be turned back into a message.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored version {found} does not match {expected}")]
    VersionMismatch { found: i64, expected: i64 },
    #[error("unreadable data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A message together with the schema version it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub version: i64,
    pub message: Message,
}

impl StoredDocument {
    pub fn current(message: Message) -> Self {
        Self {
            version: SCHEMA_VERSION,
            message,
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        discord::message_to_string(&self.message, Format::Editor)
    }

    pub fn decode(raw: &RawDocument) -> Result<Self, DecodeError> {
        if raw.version != SCHEMA_VERSION {
            return Err(DecodeError::VersionMismatch {
                found: raw.version,
                expected: SCHEMA_VERSION,
            });
        }
        let parsed = discord::str_to_message(&raw.data)?;
        Ok(Self {
            version: raw.version,
            message: parsed.message,
        })
    }
}

pub async fn save_message(storage: &dyn DocumentStorage, slot: &str, message: &Message) -> Result<()> {
    let data = StoredDocument::current(message.clone()).encode()?;
    storage.save(slot, SCHEMA_VERSION, &data).await
}

/// Load a slot, falling back to the welcome template when it is missing,
/// unreadable or written by another schema version.
pub async fn load_or_default(storage: &dyn DocumentStorage, slot: &str) -> Message {
    match storage.load(slot).await {
        Ok(Some(raw)) => match StoredDocument::decode(&raw) {
            Ok(stored) => stored.message,
            Err(e) => {
                warn!("Slot {slot} is unusable ({e}) - starting from the default message");
                default_message()
            }
        },
        Ok(None) => {
            info!("Slot {slot} is empty - starting from the default message");
            default_message()
        }
        Err(e) => {
            warn!("Failed to read slot {slot}: {e} - starting from the default message");
            default_message()
        }
    }
}

/// Load a backup. Unlike [`load_or_default`] a missing or broken backup is
/// `None`, so restoring it can be refused.
pub async fn load_backup(storage: &dyn DocumentStorage, name: &str) -> Result<Option<Message>> {
    let slot = backup_slot(name);
    let Some(raw) = storage.load(&slot).await? else {
        return Ok(None);
    };
    match StoredDocument::decode(&raw) {
        Ok(stored) => Ok(Some(stored.message)),
        Err(e) => {
            warn!("Backup {name} is unusable: {e}");
            Ok(None)
        }
    }
}

pub async fn save_backup(storage: &dyn DocumentStorage, name: &str, message: &Message) -> Result<()> {
    save_message(storage, &backup_slot(name), message).await?;
    info!("Saved backup {name}");
    Ok(())
}

pub async fn delete_backup(storage: &dyn DocumentStorage, name: &str) -> Result<bool> {
    storage.delete(&backup_slot(name)).await
}

/// Name and last write time of a stored backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

pub async fn list_backups(storage: &dyn DocumentStorage) -> Result<Vec<BackupInfo>> {
    let mut backups = Vec::new();
    for slot in storage.list(BACKUP_PREFIX).await? {
        let Some(name) = slot.strip_prefix(BACKUP_PREFIX) else {
            continue;
        };
        if let Some(raw) = storage.load(&slot).await? {
            backups.push(BackupInfo {
                name: name.to_string(),
                updated_at: raw.updated_at,
            });
        }
    }
    Ok(backups)
}

pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn new(db_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_url)?;
        if let Some(dir) = options.get_filename().parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Create database file if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database file");
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePool::connect(db_url).await?;

        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }
}

impl Clone for SqliteStorage {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl DocumentStorage for SqliteStorage {
    async fn load(&self, slot: &str) -> Result<Option<RawDocument>> {
        let row = sqlx::query("SELECT version, data, updated_at FROM documents WHERE slot = ?")
            .bind(slot)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| RawDocument {
            version: row.get::<i64, _>("version"),
            data: row.get::<String, _>("data"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        }))
    }

    async fn save(&self, slot: &str, version: i64, data: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO documents (slot, version, data, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
                version = excluded.version,
                data = excluded.data,
                updated_at = excluded.updated_at
            ",
        )
        .bind(slot)
        .bind(version)
        .bind(data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, slot: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE slot = ?")
            .bind(slot)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT slot FROM documents ORDER BY slot")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.get::<String, _>("slot"))
            .filter(|slot| slot.starts_with(prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Embed;

    async fn backup_names(storage: &dyn DocumentStorage) -> Vec<String> {
        list_backups(storage)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect()
    }

    #[tokio::test]
    async fn missing_slot_falls_back_to_default() {
        let storage = MemoryStorage::default();
        assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());
    }

    #[tokio::test]
    async fn saved_message_loads_back() {
        let storage = MemoryStorage::default();
        let mut message = default_message();
        message.embeds.push(Embed {
            id: crate::models::UniqueId(5),
            ..Embed::titled("extra")
        });

        save_message(&storage, CURRENT_SLOT, &message).await.unwrap();
        assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, message);
    }

    #[tokio::test]
    async fn version_mismatch_falls_back() {
        let storage = MemoryStorage::default();
        storage
            .save(CURRENT_SLOT, SCHEMA_VERSION + 1, r#"{"content":"future"}"#)
            .await
            .unwrap();
        assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());
    }

    #[test]
    fn decode_names_the_failure() {
        let raw = |version, data: &str| RawDocument {
            version,
            data: data.to_string(),
            updated_at: Utc::now(),
        };

        assert!(matches!(
            StoredDocument::decode(&raw(0, "{}")),
            Err(DecodeError::VersionMismatch {
                found: 0,
                expected: SCHEMA_VERSION
            })
        ));
        assert!(matches!(
            StoredDocument::decode(&raw(SCHEMA_VERSION, "{ nope")),
            Err(DecodeError::Json(_))
        ));
        let stored = StoredDocument::decode(&raw(SCHEMA_VERSION, r#"{"content":"hi"}"#)).unwrap();
        assert_eq!(stored.message.content, "hi");
    }

    #[tokio::test]
    async fn corrupt_data_falls_back() {
        let storage = MemoryStorage::default();
        storage.save(CURRENT_SLOT, SCHEMA_VERSION, "{ nope").await.unwrap();
        assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());
    }

    #[tokio::test]
    async fn backups_are_listed_by_name() {
        let storage = MemoryStorage::default();
        save_message(&storage, CURRENT_SLOT, &default_message()).await.unwrap();
        save_backup(&storage, "b", &default_message()).await.unwrap();
        save_backup(&storage, "a", &default_message()).await.unwrap();

        assert_eq!(backup_names(&storage).await, vec!["a", "b"]);
        assert!(delete_backup(&storage, "a").await.unwrap());
        assert!(!delete_backup(&storage, "a").await.unwrap());
        assert!(load_backup(&storage, "a").await.unwrap().is_none());
        assert!(load_backup(&storage, "b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sqlite_slots_round_trip() {
        let storage = SqliteStorage::new("sqlite::memory:").await.unwrap();
        assert!(storage.load(CURRENT_SLOT).await.unwrap().is_none());

        save_message(&storage, CURRENT_SLOT, &default_message()).await.unwrap();
        save_message(&storage, CURRENT_SLOT, &default_message()).await.unwrap();
        save_backup(&storage, "nightly", &default_message()).await.unwrap();

        assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());
        assert_eq!(backup_names(&storage).await, vec!["nightly"]);
        assert!(storage.delete(CURRENT_SLOT).await.unwrap());
    }
}
