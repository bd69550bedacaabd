//! Built-in documents: the welcome message shown on first start and the blank
//! message produced by "clear".

use crate::models::{Embed, EmbedField, Message, UniqueId};

/// Blurple-ish accent used by the welcome embeds.
const WELCOME_COLOR: u32 = 0x0023_7FEB;

const WELCOME_CONTENT: &str = "Welcome to **Embed Generator**! 🎉 Build rich embed messages for your Discord server without writing any JSON.\n\n\
When you are ready to start, hit **Clear** and compose your own message.\n\n\
Need a hand? Join our [support server](/discord) and ask the community.\n\n\
Our [companion bot](/invite) adds formatting helpers for mentions, channels and emoji, reaction roles, interactive components and more.";

/// The fixed welcome document. Every call returns an identical value.
pub fn default_message() -> Message {
    Message {
        content: WELCOME_CONTENT.to_string(),
        embeds: vec![
            Embed {
                id: UniqueId(652_627_557),
                title: Some("About Embed Generator".to_string()),
                description: Some(
                    "Embed Generator lets you design good looking messages and send them through \
                     webhooks, so they can use any name and avatar you like.\n\n\
                     All you need is a webhook URL from the 'Integrations' tab of your server \
                     settings. If you would rather not create one yourself, select a server and \
                     channel and the bot will create the webhook for you."
                        .to_string(),
                ),
                color: Some(WELCOME_COLOR),
                ..Embed::default()
            },
            Embed {
                id: UniqueId(10_674_342),
                title: Some("Discord Bot Integration".to_string()),
                description: Some(
                    "The bot is optional for sending messages, but it unlocks a lot more:"
                        .to_string(),
                ),
                color: Some(WELCOME_COLOR),
                fields: vec![
                    welcome_field(
                        472_281_785,
                        "Interactive Components",
                        "Add buttons and select menus that respond with text, toggle roles or \
                         send saved messages.",
                    ),
                    welcome_field(
                        608_893_643,
                        "Formatting Helpers",
                        "The /format command produces ready to paste mentions, channel tags and \
                         emoji so nothing gets mistyped.",
                    ),
                    welcome_field(
                        724_530_251,
                        "Restore Messages",
                        "Right-click any message sent with Embed Generator and pick \"Restore to \
                         Embed Generator\" to load it back into the editor.",
                    ),
                ],
                ..Embed::default()
            },
        ],
        ..Message::default()
    }
}

/// The blank document: no content, embeds or components.
pub fn empty_message() -> Message {
    Message::default()
}

fn welcome_field(id: u64, name: &str, value: &str) -> EmbedField {
    EmbedField {
        id: UniqueId(id),
        name: name.to_string(),
        value: value.to_string(),
        inline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_is_stable() {
        assert_eq!(default_message(), default_message());
    }

    #[test]
    fn empty_message_has_nothing() {
        let message = empty_message();
        assert!(message.content.is_empty());
        assert!(message.embeds.is_empty());
        assert!(message.components.is_empty());
    }
}
