//! Runtime configuration read from `EMBEDG_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::history::{DEFAULT_DEBOUNCE, DEFAULT_LIMIT, HistoryConfig};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/embedg.db";
pub const DEFAULT_VALIDATION_DEBOUNCE: Duration = Duration::from_millis(250);
pub const DEFAULT_PERSIST_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_BACKUP_SCHEDULE: &str = "0 */5 * * * *";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub history: HistoryConfig,
    pub validation_debounce: Duration,
    pub persist_debounce: Duration,
    /// Cron expression with seconds, as understood by `tokio-cron-scheduler`.
    pub backup_schedule: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            history: HistoryConfig::default(),
            validation_debounce: DEFAULT_VALIDATION_DEBOUNCE,
            persist_debounce: DEFAULT_PERSIST_DEBOUNCE,
            backup_schedule: DEFAULT_BACKUP_SCHEDULE.to_string(),
        }
    }
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Values that fail to parse keep
    /// their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: Duration| {
            parsed(&lookup, key, default.as_millis() as u64).map_or(default, Duration::from_millis)
        };

        Self {
            database_url: lookup("EMBEDG_DATABASE_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            history: HistoryConfig {
                limit: parsed(&lookup, "EMBEDG_HISTORY_LIMIT", DEFAULT_LIMIT)
                    .unwrap_or(DEFAULT_LIMIT),
                debounce: millis("EMBEDG_HISTORY_DEBOUNCE_MS", DEFAULT_DEBOUNCE),
            },
            validation_debounce: millis(
                "EMBEDG_VALIDATION_DEBOUNCE_MS",
                DEFAULT_VALIDATION_DEBOUNCE,
            ),
            persist_debounce: millis("EMBEDG_PERSIST_DEBOUNCE_MS", DEFAULT_PERSIST_DEBOUNCE),
            backup_schedule: lookup("EMBEDG_BACKUP_SCHEDULE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BACKUP_SCHEDULE.to_string()),
        }
    }
}

fn parsed<T: FromStr + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{key}={raw:?} is not a valid number - using {default}");
            None
        }
    }
}
