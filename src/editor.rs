//! The live editing session: one [`MessageStore`] shared behind a mutex, with
//! validation and persistence trailing the edits.
//!
//! Every change applies to the document immediately. Re-validation and the
//! write of the current slot are each scheduled after a short quiet period;
//! a newer change cancels the pending task and schedules a fresh one, so a
//! burst of typing results in a single validation and a single write.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::database::{
    BackupInfo, CURRENT_SLOT, delete_backup, list_backups, load_backup, load_or_default,
    save_backup, save_message,
};
use crate::models::Message;
use crate::store::{Command, MessageStore};
use crate::traits::DocumentStorage;
use crate::validation::{ValidationIssue, validate};

/// Name of the backup slot the scheduled job overwrites.
pub const AUTO_BACKUP: &str = "auto";

#[derive(Default)]
struct Pending {
    validation: Option<CancellationToken>,
    persist: Option<CancellationToken>,
}

#[derive(Clone)]
pub struct EditorSession {
    store: Arc<Mutex<MessageStore>>,
    storage: Arc<dyn DocumentStorage>,
    issues: Arc<watch::Sender<Vec<ValidationIssue>>>,
    pending: Arc<Mutex<Pending>>,
    config: Config,
}

impl EditorSession {
    /// Open the current slot (or the welcome message) and validate it.
    pub async fn open(storage: Arc<dyn DocumentStorage>, config: Config) -> Self {
        let message = load_or_default(storage.as_ref(), CURRENT_SLOT).await;
        let issues = validate(&message);
        info!("Session opened with {} validation issues", issues.len());

        let (tx, _) = watch::channel(issues);
        Self {
            store: Arc::new(Mutex::new(MessageStore::new(message, config.history))),
            storage,
            issues: Arc::new(tx),
            pending: Arc::new(Mutex::new(Pending::default())),
            config,
        }
    }

    pub async fn message(&self) -> Message {
        self.store.lock().await.message().clone()
    }

    /// Latest validation result. Updates trail edits by the validation delay.
    pub fn issues(&self) -> watch::Receiver<Vec<ValidationIssue>> {
        self.issues.subscribe()
    }

    pub async fn apply(&self, command: Command) -> bool {
        let changed = self.store.lock().await.apply(command);
        if changed {
            self.schedule().await;
        }
        changed
    }

    /// Run `f` against the store, scheduling follow-up work when the
    /// document changed.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut MessageStore) -> R) -> R {
        let (result, changed) = {
            let mut store = self.store.lock().await;
            let before = store.message().clone();
            let result = f(&mut store);
            let changed = *store.message() != before;
            (result, changed)
        };
        if changed {
            self.schedule().await;
        }
        result
    }

    pub async fn undo(&self, steps: usize) -> usize {
        let moved = self.store.lock().await.undo(steps);
        if moved > 0 {
            self.schedule().await;
        }
        moved
    }

    pub async fn redo(&self, steps: usize) -> usize {
        let moved = self.store.lock().await.redo(steps);
        if moved > 0 {
            self.schedule().await;
        }
        moved
    }

    async fn schedule(&self) {
        let mut pending = self.pending.lock().await;

        let token = replace_token(&mut pending.validation);
        let session = self.clone();
        let delay = self.config.validation_debounce;
        tokio::spawn(async move {
            if wait(&token, delay).await {
                session.revalidate().await;
            }
        });

        let token = replace_token(&mut pending.persist);
        let session = self.clone();
        let delay = self.config.persist_debounce;
        tokio::spawn(async move {
            if wait(&token, delay).await
                && let Err(e) = session.persist().await
            {
                error!("Failed to save current message: {}", e);
            }
        });
    }

    async fn revalidate(&self) {
        let message = self.message().await;
        let issues = validate(&message);
        debug!("Validated current message: {} issues", issues.len());
        self.issues.send_replace(issues);
    }

    async fn persist(&self) -> Result<()> {
        let message = self.message().await;
        save_message(self.storage.as_ref(), CURRENT_SLOT, &message).await?;
        debug!("Saved current message");
        Ok(())
    }

    /// Run pending validation and persistence now instead of waiting.
    pub async fn flush(&self) -> Result<()> {
        let (validation, persist) = {
            let mut pending = self.pending.lock().await;
            (pending.validation.take(), pending.persist.take())
        };
        if let Some(token) = validation {
            token.cancel();
            self.revalidate().await;
        }
        if let Some(token) = persist {
            token.cancel();
            self.persist().await?;
        }
        Ok(())
    }

    pub async fn backup(&self, name: &str) -> Result<()> {
        let message = self.message().await;
        save_backup(self.storage.as_ref(), name, &message).await
    }

    /// Replace the document with a backup. Undoable like any other edit.
    pub async fn restore(&self, name: &str) -> Result<()> {
        let Some(message) = load_backup(self.storage.as_ref(), name).await? else {
            bail!("no usable backup named {name}");
        };
        self.apply(Command::Replace(Box::new(message))).await;
        info!("Restored backup {name}");
        Ok(())
    }

    pub async fn backups(&self) -> Result<Vec<BackupInfo>> {
        list_backups(self.storage.as_ref()).await
    }

    pub async fn delete_backup(&self, name: &str) -> Result<bool> {
        delete_backup(self.storage.as_ref(), name).await
    }

    /// Start overwriting the [`AUTO_BACKUP`] slot on the configured schedule.
    /// The returned scheduler keeps running until shut down.
    pub async fn start_backups(&self) -> Result<JobScheduler> {
        let sched = JobScheduler::new().await?;

        let session = self.clone();
        sched
            .add(Job::new_async(
                self.config.backup_schedule.as_str(),
                move |_uuid, _l| {
                    let session = session.clone();
                    Box::pin(async move {
                        match session.backup(AUTO_BACKUP).await {
                            Ok(()) => debug!("Automatic backup at {}", Utc::now()),
                            Err(e) => error!("Automatic backup failed: {}", e),
                        }
                    })
                },
            )?)
            .await?;

        info!(
            "Scheduler started - backing up with schedule {}",
            self.config.backup_schedule
        );
        sched.start().await?;
        Ok(sched)
    }
}

/// Cancel the previous task of this kind and hand out a token for the next.
fn replace_token(slot: &mut Option<CancellationToken>) -> CancellationToken {
    if let Some(old) = slot.take() {
        old.cancel();
    }
    let token = CancellationToken::new();
    *slot = Some(token.clone());
    token
}

/// Sleep for `delay` unless cancelled first. True when the delay elapsed.
async fn wait(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        () = token.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}
