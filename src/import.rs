//! JSON import and export of whole documents.
//!
//! A single message is imported from its webhook/editor JSON. Collections of
//! named messages travel in export bundles, which come in two shapes:
//!
//! ```json
//! { "messages": [{ "name": "...", "description": null, "data": { ... } }] }
//! { "backups":  [{ "name": "...", "messages": [{ "data": { ... } }] }] }
//! ```
//!
//! The second one is the older backup format. Every message of it becomes one
//! named entry, without description.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::discord::{self, Format, Parsed};
use crate::models::Message;
use crate::validation::{ValidationIssue, validate};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Everything the editor needs to decide whether to accept an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Import {
    pub message: Message,
    /// Parts of the input that were dropped.
    pub warnings: Vec<String>,
    /// Validation issues of the parsed message.
    pub issues: Vec<ValidationIssue>,
}

impl Import {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.issues.is_empty()
    }
}

/// Lenient parse of one message. Fails only on malformed JSON.
pub fn parse_lenient(raw: &str) -> Result<Parsed, ImportError> {
    let parsed = discord::str_to_message(raw)?;
    if !parsed.warnings.is_empty() {
        warn!("Import dropped {} unsupported parts", parsed.warnings.len());
    }
    Ok(parsed)
}

/// Lenient parse followed by validation; any issue or dropped part rejects
/// the input.
pub fn parse_strict(raw: &str) -> Result<Message, ImportError> {
    let Parsed { message, warnings } = parse_lenient(raw)?;
    let mut problems = warnings;
    problems.extend(validate(&message).iter().map(ToString::to_string));
    if problems.is_empty() {
        Ok(message)
    } else {
        Err(ImportError::Invalid(problems))
    }
}

/// Parse and check a message without applying it anywhere.
pub fn import_message(raw: &str) -> Result<Import, ImportError> {
    let Parsed { message, warnings } = parse_lenient(raw)?;
    let issues = validate(&message);
    info!(
        "Imported message with {} warnings and {} validation issues",
        warnings.len(),
        issues.len()
    );
    Ok(Import {
        message,
        warnings,
        issues,
    })
}

/// A named message inside an export bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMessage {
    pub name: String,
    pub description: Option<String>,
    pub message: Message,
}

#[derive(Debug, Serialize, Deserialize)]
struct BundleEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct LegacyBackup {
    name: String,
    messages: Vec<LegacyBackupMessage>,
}

#[derive(Debug, Deserialize)]
struct LegacyBackupMessage {
    data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Bundle {
    Messages { messages: Vec<BundleEntry> },
    Backups { backups: Vec<LegacyBackup> },
}

#[derive(Debug, Serialize)]
struct BundleOut<'a> {
    messages: Vec<BundleEntryOut<'a>>,
}

#[derive(Debug, Serialize)]
struct BundleEntryOut<'a> {
    name: &'a str,
    description: Option<&'a str>,
    data: Value,
}

pub fn export_bundle(messages: &[NamedMessage]) -> serde_json::Result<String> {
    let entries = messages
        .iter()
        .map(|m| {
            Ok(BundleEntryOut {
                name: &m.name,
                description: m.description.as_deref(),
                data: discord::message_to_json(&m.message, Format::Editor)?,
            })
        })
        .collect::<serde_json::Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&BundleOut { messages: entries })
}

/// Read either bundle shape. Messages are parsed leniently; their warnings
/// are returned alongside, prefixed with the entry name.
pub fn import_bundle(raw: &str) -> Result<(Vec<NamedMessage>, Vec<String>), ImportError> {
    let entries = match serde_json::from_str::<Bundle>(raw)? {
        Bundle::Messages { messages } => messages,
        Bundle::Backups { backups } => backups
            .into_iter()
            .flat_map(|backup| {
                let name = backup.name;
                backup.messages.into_iter().map(move |m| BundleEntry {
                    name: name.clone(),
                    description: None,
                    data: m.data,
                })
            })
            .collect(),
    };

    let mut messages = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();
    for entry in entries {
        let parsed = discord::json_to_message(entry.data)?;
        warnings.extend(
            parsed
                .warnings
                .into_iter()
                .map(|w| format!("{}: {w}", entry.name)),
        );
        messages.push(NamedMessage {
            name: entry.name,
            description: entry.description,
            message: parsed.message,
        });
    }
    info!("Imported {} messages from bundle", messages.len());
    Ok((messages, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::default_message;

    #[test]
    fn strict_rejects_invalid_message() {
        let err = parse_strict(r#"{ "embeds": [{ "title": "" }] }"#).unwrap_err();
        let ImportError::Invalid(problems) = err else {
            panic!("expected validation failure");
        };
        assert!(!problems.is_empty());
    }

    #[test]
    fn strict_accepts_default_template() {
        let raw = discord::message_to_string(&default_message(), Format::Webhook).unwrap();
        let message = parse_strict(&raw).unwrap();
        assert_eq!(message.without_ids(), default_message().without_ids());
    }

    #[test]
    fn strict_rejects_dropped_parts() {
        let raw = r#"{ "content": "hi", "components": [{ "type": 42 }] }"#;
        assert!(matches!(parse_strict(raw), Err(ImportError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(import_message("{"), Err(ImportError::Json(_))));
    }

    #[test]
    fn import_reports_issues_without_rejecting() {
        let import = import_message(r#"{ "content": "" }"#).unwrap();
        assert!(!import.issues.is_empty());
        assert!(!import.is_clean());
    }

    #[test]
    fn legacy_backup_bundle_is_flattened() {
        let raw = r#"{
            "backups": [{
                "name": "old",
                "messages": [{ "data": { "content": "one" } }, { "data": { "content": "two" } }]
            }]
        }"#;
        let (messages, warnings) = import_bundle(raw).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.name == "old" && m.description.is_none()));
        assert_eq!(messages[1].message.content, "two");
    }

    #[test]
    fn bundle_export_reads_back() {
        let named = NamedMessage {
            name: "welcome".to_string(),
            description: Some("first start".to_string()),
            message: default_message(),
        };
        let raw = export_bundle(std::slice::from_ref(&named)).unwrap();
        let (messages, _) = import_bundle(&raw).unwrap();
        assert_eq!(messages, vec![named]);
    }
}
