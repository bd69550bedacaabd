//! Embed Generator message document store.
//!
//! Holds one Discord message document, mutates it through typed commands with
//! bounded undo/redo, validates it against Discord's limits, converts it to
//! and from webhook JSON and keeps it in durable slots.

pub mod config;
pub mod database;
pub mod discord;
pub mod editor;
pub mod history;
pub mod import;
pub mod models;
pub mod normalize;
pub mod store;
pub mod templates;
pub mod traits;
pub mod validation;

pub use config::Config;
pub use editor::EditorSession;
pub use models::Message;
pub use store::{Command, MessageStore, NodePath};
