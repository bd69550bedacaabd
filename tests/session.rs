use std::sync::Arc;
use std::time::Duration;

use embed_generator::database::{CURRENT_SLOT, MemoryStorage, load_or_default, save_backup};
use embed_generator::models::Embed;
use embed_generator::store::Command;
use embed_generator::templates::default_message;
use embed_generator::traits::DocumentStorage;
use embed_generator::{Config, EditorSession};

async fn session() -> (EditorSession, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    let session = EditorSession::open(storage.clone(), Config::default()).await;
    (session, storage)
}

#[tokio::test(start_paused = true)]
async fn edits_are_visible_immediately() {
    let (session, _) = session().await;
    assert!(session.apply(Command::SetContent("now".to_string())).await);
    assert_eq!(session.message().await.content, "now");
}

#[tokio::test(start_paused = true)]
async fn validation_trails_a_burst_of_edits() {
    let (session, _) = session().await;
    let mut issues = session.issues();
    assert!(issues.borrow_and_update().is_empty());

    session.apply(Command::SetContent("x".repeat(2001))).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.apply(Command::SetContent("y".repeat(2002))).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!issues.has_changed().unwrap());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(issues.has_changed().unwrap());
    let latest = issues.borrow_and_update().clone();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].path, "content");
}

#[tokio::test(start_paused = true)]
async fn store_edits_schedule_like_commands() {
    let (session, storage) = session().await;
    let added = session.edit(|store| store.add_embed(Embed::titled("via edit"))).await;
    assert!(added);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let message = load_or_default(storage.as_ref(), CURRENT_SLOT).await;
    assert_eq!(message.embeds.last().and_then(|e| e.title.as_deref()), Some("via edit"));
}

#[tokio::test(start_paused = true)]
async fn persistence_waits_for_quiet_period() {
    let (session, storage) = session().await;
    assert!(storage.load(CURRENT_SLOT).await.unwrap().is_none());

    session.apply(Command::SetContent("saved".to_string())).await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(storage.load(CURRENT_SLOT).await.unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let message = load_or_default(storage.as_ref(), CURRENT_SLOT).await;
    assert_eq!(message.content, "saved");
}

#[tokio::test(start_paused = true)]
async fn flush_writes_without_waiting() {
    let (session, storage) = session().await;
    session.apply(Command::AddEmbed(Embed::titled("flushed"))).await;
    session.flush().await.unwrap();

    let message = load_or_default(storage.as_ref(), CURRENT_SLOT).await;
    assert_eq!(message, session.message().await);
}

#[tokio::test(start_paused = true)]
async fn reopening_restores_the_saved_document() {
    let (session, storage) = session().await;
    session.apply(Command::Clear).await;
    session.apply(Command::SetContent("persisted".to_string())).await;
    session.flush().await.unwrap();

    let reopened = EditorSession::open(storage, Config::default()).await;
    assert_eq!(reopened.message().await, session.message().await);
}

#[tokio::test(start_paused = true)]
async fn restore_is_undoable() {
    let (session, storage) = session().await;
    let mut backup = default_message();
    backup.content = "from backup".to_string();
    save_backup(storage.as_ref(), "old", &backup).await.unwrap();

    session.restore("old").await.unwrap();
    assert_eq!(session.message().await.content, "from backup");
    assert_eq!(session.undo(1).await, 1);
    assert_eq!(session.message().await, default_message());

    assert!(session.restore("missing").await.is_err());
}

#[tokio::test(start_paused = true)]
async fn backups_are_listed() {
    let (session, _) = session().await;
    session.backup("one").await.unwrap();
    let names: Vec<String> = session
        .backups()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, ["one"]);
    assert!(session.delete_backup("one").await.unwrap());
}
