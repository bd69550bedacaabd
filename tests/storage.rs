use embed_generator::database::{
    CURRENT_SLOT, SCHEMA_VERSION, SqliteStorage, load_or_default, save_message,
};
use embed_generator::import::{NamedMessage, export_bundle, import_bundle};
use embed_generator::models::Embed;
use embed_generator::templates::{default_message, empty_message};
use embed_generator::traits::DocumentStorage;

fn db_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite:{}", dir.path().join("nested/embedg.db").display())
}

#[tokio::test]
async fn sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = db_url(&dir);

    let mut message = empty_message();
    message.content = "kept".to_string();
    message.embeds.push(Embed::titled("on disk"));
    let mut ids = embed_generator::models::IdGenerator::default();
    message.assign_missing_ids(&mut ids);

    {
        let storage = SqliteStorage::new(&url).await.unwrap();
        save_message(&storage, CURRENT_SLOT, &message).await.unwrap();
    }

    let storage = SqliteStorage::new(&url).await.unwrap();
    assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, message);
}

#[tokio::test]
async fn sqlite_corrupt_row_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::new(&db_url(&dir)).await.unwrap();

    storage
        .save(CURRENT_SLOT, SCHEMA_VERSION, "[1, 2")
        .await
        .unwrap();
    assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());

    storage
        .save(CURRENT_SLOT, 0, r#"{"content":"old schema"}"#)
        .await
        .unwrap();
    assert_eq!(load_or_default(&storage, CURRENT_SLOT).await, default_message());
}

#[tokio::test]
async fn export_bundle_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");

    let messages = vec![
        NamedMessage {
            name: "welcome".to_string(),
            description: None,
            message: default_message(),
        },
        NamedMessage {
            name: "blank".to_string(),
            description: Some("nothing here".to_string()),
            message: empty_message(),
        },
    ];
    tokio::fs::write(&path, export_bundle(&messages).unwrap())
        .await
        .unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let (imported, warnings) = import_bundle(&raw).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(imported, messages);
}
