//! Checks a message against Discord's limits.
//!
//! Problems are data, not errors: editing stays possible and the issues are
//! shown next to the offending field, keyed by a dotted path such as
//! `embeds.0.fields.2.value`.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use url::Url;

use crate::models::{
    Action, ActionRow, ActionRowItem, ActionSet, Button, ButtonKind, Component, Container,
    ContainerChild, Embed, MediaGallery, Message, Section, SectionAccessory, SelectMenu,
    TextDisplay, limits,
};

const MAX_CONTENT: usize = 2000;
const MAX_USERNAME: usize = 80;
const MAX_THREAD_NAME: usize = 100;
const MAX_TITLE: usize = 256;
const MAX_DESCRIPTION: usize = 4096;
const MAX_FOOTER_TEXT: usize = 2048;
const MAX_AUTHOR_NAME: usize = 256;
const MAX_FIELD_NAME: usize = 256;
const MAX_FIELD_VALUE: usize = 1024;
const MAX_EMBED_TOTAL: usize = 6000;
const MAX_COLOR: u32 = 0xFF_FFFF;
const MAX_BUTTON_LABEL: usize = 80;
const MAX_OPTION_LABEL: usize = 100;
const MAX_OPTION_DESCRIPTION: usize = 100;
const MAX_PLACEHOLDER: usize = 150;
const MAX_TEXT_DISPLAY: usize = 4000;
const MAX_MEDIA_DESCRIPTION: usize = 1024;
const MAX_ACTION_TEXT: usize = 2000;

const ATTACHMENT_SCHEME: &str = "attachment://";

static HOSTNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[a-zA-Z]{2,}$").expect("hostname regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub fn validate(message: &Message) -> Vec<ValidationIssue> {
    let mut validator = Validator::default();
    validator.message(message);
    validator.issues
}

/// True when `value` parses as a URL whose host ends in a real-looking TLD.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .ok()
        .and_then(|url| url.host_str().map(|host| HOSTNAME_RE.is_match(host)))
        .unwrap_or(false)
}

#[derive(Default)]
struct Validator {
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn max_chars(&mut self, path: impl Into<String>, value: &str, max: usize) {
        if value.chars().count() > max {
            self.issue(path, format!("Must be at most {max} characters long"));
        }
    }

    fn chars_between(&mut self, path: impl Into<String>, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.issue(path, format!("Must be at least {min} characters long"));
        } else if len > max {
            self.issue(path, format!("Must be at most {max} characters long"));
        }
    }

    fn count_between(&mut self, path: impl Into<String>, len: usize, min: usize, max: usize) {
        if len < min {
            self.issue(path, format!("Must contain at least {min} items"));
        } else if len > max {
            self.issue(path, format!("Must contain at most {max} items"));
        }
    }

    fn url(&mut self, path: impl Into<String>, value: &str) {
        if !is_valid_url(value) {
            self.issue(path, "Invalid URL");
        }
    }

    fn image_url(&mut self, path: impl Into<String>, value: &str) {
        if !is_valid_url(value) {
            self.issue(path, "Invalid image URL");
        }
    }

    /// Media in Components V2 may also point at an uploaded attachment.
    fn media_url(&mut self, path: impl Into<String>, value: &str) {
        if !value.starts_with(ATTACHMENT_SCHEME) && !is_valid_url(value) {
            self.issue(path, "Invalid media URL");
        }
    }

    fn color(&mut self, path: impl Into<String>, color: Option<u32>) {
        if color.is_some_and(|c| c > MAX_COLOR) {
            self.issue(path, "Color must be between 0x000000 and 0xFFFFFF");
        }
    }

    fn message(&mut self, message: &Message) {
        self.max_chars("content", &message.content, MAX_CONTENT);
        if let Some(username) = &message.username {
            self.max_chars("username", username, MAX_USERNAME);
        }
        if let Some(avatar_url) = &message.avatar_url {
            self.image_url("avatar_url", avatar_url);
        }
        if let Some(thread_name) = &message.thread_name {
            self.max_chars("thread_name", thread_name, MAX_THREAD_NAME);
        }

        if message.components_v2_enabled() {
            self.components_v2(message);
        } else {
            self.legacy(message);
        }

        for (id, set) in &message.actions {
            self.action_set(&format!("actions.{id}"), set);
        }
    }

    fn legacy(&mut self, message: &Message) {
        if message.content.is_empty()
            && message.embeds.is_empty()
            && message.components.is_empty()
            && message.attachments.is_empty()
        {
            self.issue("content", "Content is required when no other fields are set");
        }

        if message.embeds.len() > limits::MAX_EMBEDS {
            self.issue(
                "embeds",
                format!("Must contain at most {} items", limits::MAX_EMBEDS),
            );
        }
        for (i, embed) in message.embeds.iter().enumerate() {
            self.embed(&format!("embeds.{i}"), embed);
        }
        let total: usize = message.embeds.iter().map(Embed::text_len).sum();
        if total > MAX_EMBED_TOTAL {
            self.issue(
                "embeds",
                format!("Embeds must not contain more than {MAX_EMBED_TOTAL} characters in total"),
            );
        }

        if message.components.len() > limits::MAX_LEGACY_ROWS {
            self.issue(
                "components",
                format!("Must contain at most {} items", limits::MAX_LEGACY_ROWS),
            );
        }
        for (i, component) in message.components.iter().enumerate() {
            let path = format!("components.{i}");
            match component {
                Component::ActionRow(row) => self.action_row(&path, row),
                _ => self.issue(path, "Components V2 must be enabled to use this component"),
            }
        }
    }

    fn components_v2(&mut self, message: &Message) {
        if !message.content.is_empty() {
            self.issue("content", "Content can not be used with Components V2");
        }
        if !message.embeds.is_empty() {
            self.issue("embeds", "Embeds can not be used with Components V2");
        }
        self.count_between(
            "components",
            message.components.len(),
            1,
            limits::MAX_ROOT_COMPONENTS,
        );

        for (i, component) in message.components.iter().enumerate() {
            let path = format!("components.{i}");
            match component {
                Component::Container(container) => self.container(&path, container),
                Component::ActionRow(row) => self.action_row(&path, row),
                Component::Section(section) => self.section(&path, section),
                Component::TextDisplay(text) => self.text_display(&path, text),
                Component::MediaGallery(gallery) => self.gallery(&path, gallery),
                Component::File(file) => self.media_url(format!("{path}.file.url"), &file.file.url),
                Component::Separator(_) => {}
            }
        }
    }

    fn embed(&mut self, path: &str, embed: &Embed) {
        if let Some(title) = &embed.title {
            self.max_chars(format!("{path}.title"), title, MAX_TITLE);
        }
        if let Some(description) = &embed.description {
            self.max_chars(format!("{path}.description"), description, MAX_DESCRIPTION);
        }
        if let Some(url) = &embed.url {
            self.url(format!("{path}.url"), url);
            if embed.title.as_deref().is_none_or(str::is_empty) {
                self.issue(format!("{path}.title"), "Title is required when URL is set");
            }
        }
        if let Some(timestamp) = &embed.timestamp
            && DateTime::parse_from_rfc3339(timestamp).is_err()
        {
            self.issue(format!("{path}.timestamp"), "Invalid timestamp");
        }
        self.color(format!("{path}.color"), embed.color);

        if let Some(footer) = &embed.footer {
            if let Some(text) = &footer.text {
                self.max_chars(format!("{path}.footer.text"), text, MAX_FOOTER_TEXT);
            }
            if let Some(icon_url) = &footer.icon_url {
                self.image_url(format!("{path}.footer.icon_url"), icon_url);
            }
        }
        if let Some(author) = &embed.author {
            self.chars_between(format!("{path}.author.name"), &author.name, 1, MAX_AUTHOR_NAME);
            if let Some(url) = &author.url {
                self.url(format!("{path}.author.url"), url);
            }
            if let Some(icon_url) = &author.icon_url {
                self.image_url(format!("{path}.author.icon_url"), icon_url);
            }
        }
        if let Some(image) = &embed.image {
            self.url(format!("{path}.image.url"), &image.url);
        }
        if let Some(thumbnail) = &embed.thumbnail {
            self.url(format!("{path}.thumbnail.url"), &thumbnail.url);
        }

        if embed.fields.len() > limits::MAX_EMBED_FIELDS {
            self.issue(
                format!("{path}.fields"),
                format!("Must contain at most {} items", limits::MAX_EMBED_FIELDS),
            );
        }
        for (j, field) in embed.fields.iter().enumerate() {
            let field_path = format!("{path}.fields.{j}");
            self.chars_between(format!("{field_path}.name"), &field.name, 1, MAX_FIELD_NAME);
            self.chars_between(format!("{field_path}.value"), &field.value, 1, MAX_FIELD_VALUE);
        }

        if embed.has_no_content() {
            self.issue(
                format!("{path}.description"),
                "Description is required when no other fields are set",
            );
        }
    }

    fn action_row(&mut self, path: &str, row: &ActionRow) {
        let items_path = format!("{path}.components");
        self.count_between(&items_path, row.components.len(), 1, limits::MAX_ROW_BUTTONS);
        let has_menu = row
            .components
            .iter()
            .any(|item| matches!(item, ActionRowItem::SelectMenu(_)));
        if has_menu && row.components.len() > 1 {
            self.issue(
                items_path.clone(),
                "A select menu must be the only component in its row",
            );
        }

        for (j, item) in row.components.iter().enumerate() {
            let item_path = format!("{items_path}.{j}");
            match item {
                ActionRowItem::Button(button) => self.button(&item_path, button),
                ActionRowItem::SelectMenu(menu) => self.select_menu(&item_path, menu),
            }
        }
    }

    fn button(&mut self, path: &str, button: &Button) {
        self.chars_between(format!("{path}.label"), &button.label, 1, MAX_BUTTON_LABEL);
        if let ButtonKind::Link { url } = &button.kind {
            self.url(format!("{path}.url"), url);
        }
    }

    fn select_menu(&mut self, path: &str, menu: &SelectMenu) {
        if let Some(placeholder) = &menu.placeholder {
            self.max_chars(format!("{path}.placeholder"), placeholder, MAX_PLACEHOLDER);
        }
        let max_options = limits::MAX_SELECT_OPTIONS as u8;
        if menu.min_values.is_some_and(|min| min > max_options)
            || menu.max_values.is_some_and(|max| max == 0 || max > max_options)
        {
            self.issue(
                format!("{path}.max_values"),
                format!("Must be between 1 and {max_options}"),
            );
        }
        if let (Some(min), Some(max)) = (menu.min_values, menu.max_values)
            && min > max
        {
            self.issue(
                format!("{path}.min_values"),
                "Minimum values can not be larger than maximum values",
            );
        }

        let options_path = format!("{path}.options");
        self.count_between(&options_path, menu.options.len(), 1, limits::MAX_SELECT_OPTIONS);
        for (k, option) in menu.options.iter().enumerate() {
            let option_path = format!("{options_path}.{k}");
            self.chars_between(format!("{option_path}.label"), &option.label, 1, MAX_OPTION_LABEL);
            if let Some(description) = &option.description {
                self.max_chars(
                    format!("{option_path}.description"),
                    description,
                    MAX_OPTION_DESCRIPTION,
                );
            }
        }
    }

    fn section(&mut self, path: &str, section: &Section) {
        let texts_path = format!("{path}.components");
        self.count_between(&texts_path, section.components.len(), 1, limits::MAX_SECTION_TEXTS);
        for (j, text) in section.components.iter().enumerate() {
            self.text_display(&format!("{texts_path}.{j}"), text);
        }

        let accessory_path = format!("{path}.accessory");
        match &section.accessory {
            SectionAccessory::Button(button) => self.button(&accessory_path, button),
            SectionAccessory::Thumbnail(thumbnail) => {
                self.media_url(format!("{accessory_path}.media.url"), &thumbnail.media.url);
                if let Some(description) = &thumbnail.description {
                    self.max_chars(
                        format!("{accessory_path}.description"),
                        description,
                        MAX_MEDIA_DESCRIPTION,
                    );
                }
            }
        }
    }

    fn text_display(&mut self, path: &str, text: &TextDisplay) {
        self.chars_between(format!("{path}.content"), &text.content, 1, MAX_TEXT_DISPLAY);
    }

    fn gallery(&mut self, path: &str, gallery: &MediaGallery) {
        let items_path = format!("{path}.items");
        self.count_between(&items_path, gallery.items.len(), 1, limits::MAX_GALLERY_ITEMS);
        for (j, item) in gallery.items.iter().enumerate() {
            let item_path = format!("{items_path}.{j}");
            self.media_url(format!("{item_path}.media.url"), &item.media.url);
            if let Some(description) = &item.description {
                self.max_chars(
                    format!("{item_path}.description"),
                    description,
                    MAX_MEDIA_DESCRIPTION,
                );
            }
        }
    }

    fn container(&mut self, path: &str, container: &Container) {
        self.color(format!("{path}.accent_color"), container.accent_color);
        let children_path = format!("{path}.components");
        self.count_between(
            &children_path,
            container.components.len(),
            1,
            limits::MAX_CONTAINER_CHILDREN,
        );

        for (j, child) in container.components.iter().enumerate() {
            let child_path = format!("{children_path}.{j}");
            match child {
                ContainerChild::ActionRow(row) => self.action_row(&child_path, row),
                ContainerChild::Section(section) => self.section(&child_path, section),
                ContainerChild::TextDisplay(text) => self.text_display(&child_path, text),
                ContainerChild::MediaGallery(gallery) => self.gallery(&child_path, gallery),
                ContainerChild::File(file) => {
                    self.media_url(format!("{child_path}.file.url"), &file.file.url)
                }
                ContainerChild::Separator(_) => {}
            }
        }
    }

    fn action_set(&mut self, path: &str, set: &ActionSet) {
        let actions_path = format!("{path}.actions");
        self.count_between(&actions_path, set.actions.len(), 1, limits::MAX_ACTIONS);
        for (i, action) in set.actions.iter().enumerate() {
            self.action(&format!("{actions_path}.{i}"), action);
        }
    }

    fn action(&mut self, path: &str, action: &Action) {
        if action.accepts_text() {
            self.chars_between(format!("{path}.text"), &action.text, 1, MAX_ACTION_TEXT);
        }
        if action.accepts_target() && action.target_id.is_empty() {
            self.issue(format!("{path}.target_id"), "A target is required");
        }
        if action.kind == crate::models::ActionType::PermissionCheck
            && action.permissions.parse::<u64>().is_err()
        {
            self.issue(format!("{path}.permissions"), "Permissions must be a number");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ActionType, ButtonStyle, EmbedAuthor, EmbedField, EmbedMedia, FLAG_COMPONENTS_V2,
        FileComponent, MediaGalleryItem, MediaItem, SelectMenuOption, UniqueId,
    };
    use crate::templates::{default_message, empty_message};

    fn paths(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.path.as_str()).collect()
    }

    #[test]
    fn default_template_is_valid() {
        assert_eq!(validate(&default_message()), Vec::new());
    }

    #[test]
    fn empty_message_needs_content() {
        let issues = validate(&empty_message());
        assert_eq!(paths(&issues), vec!["content"]);
    }

    #[test]
    fn content_length_is_checked() {
        let message = Message {
            content: "a".repeat(2001),
            ..Message::default()
        };
        assert_eq!(paths(&validate(&message)), vec!["content"]);
    }

    #[test]
    fn embed_rules() {
        let message = Message {
            embeds: vec![
                Embed::default(),
                Embed {
                    url: Some("https://example.com".to_string()),
                    description: Some("x".to_string()),
                    ..Embed::default()
                },
                Embed {
                    title: Some("t".to_string()),
                    timestamp: Some("yesterday".to_string()),
                    color: Some(0x100_0000),
                    author: Some(EmbedAuthor::default()),
                    fields: vec![EmbedField::new("", "v")],
                    ..Embed::default()
                },
            ],
            ..Message::default()
        };

        let issues = validate(&message);
        assert_eq!(
            paths(&issues),
            vec![
                "embeds.0.description",
                "embeds.1.title",
                "embeds.2.timestamp",
                "embeds.2.color",
                "embeds.2.author.name",
                "embeds.2.fields.0.name",
            ]
        );
    }

    #[test]
    fn url_needs_a_real_hostname() {
        assert!(is_valid_url("https://example.com/a.png"));
        assert!(!is_valid_url("https://localhost/a.png"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn legacy_rejects_v2_nodes_and_bad_rows() {
        let message = Message {
            content: "hi".to_string(),
            components: vec![
                Component::TextDisplay(TextDisplay::new("text")),
                Component::ActionRow(ActionRow {
                    id: UniqueId(1),
                    components: vec![
                        ActionRowItem::Button(Button::interactive("", ButtonStyle::Primary)),
                        ActionRowItem::SelectMenu(SelectMenu::default()),
                    ],
                }),
            ],
            ..Message::default()
        };

        let issues = validate(&message);
        assert_eq!(
            paths(&issues),
            vec![
                "components.0",
                "components.1.components",
                "components.1.components.0.label",
                "components.1.components.1.options",
            ]
        );
    }

    #[test]
    fn components_v2_rules() {
        let message = Message {
            content: "not allowed".to_string(),
            flags: FLAG_COMPONENTS_V2,
            components: vec![Component::Container(Container {
                accent_color: Some(0x58_65F2),
                components: vec![ContainerChild::TextDisplay(TextDisplay::new(""))],
                ..Container::default()
            })],
            ..Message::default()
        };

        let issues = validate(&message);
        assert_eq!(
            paths(&issues),
            vec!["content", "components.0.components.0.content"]
        );
    }

    #[test]
    fn empty_v2_document_is_flagged() {
        let message = Message {
            flags: FLAG_COMPONENTS_V2,
            ..Message::default()
        };
        assert_eq!(paths(&validate(&message)), vec!["components"]);
    }

    #[test]
    fn action_sets_need_actions() {
        let mut message = Message {
            content: "hi".to_string(),
            ..Message::default()
        };
        message.actions.insert("7".to_string(), ActionSet::default());
        message.actions.insert(
            "8".to_string(),
            ActionSet {
                actions: vec![Action::of_type(ActionType::AddRole, UniqueId(3))],
            },
        );

        let issues = validate(&message);
        assert_eq!(
            paths(&issues),
            vec!["actions.7.actions", "actions.8.actions.0.target_id"]
        );
    }

    fn v2(components: Vec<Component>) -> Message {
        Message {
            flags: FLAG_COMPONENTS_V2,
            components,
            ..Message::default()
        }
    }

    fn texts(n: usize) -> Vec<TextDisplay> {
        (0..n).map(|i| TextDisplay::new(format!("text {i}"))).collect()
    }

    fn gallery(n: usize) -> Component {
        Component::MediaGallery(MediaGallery {
            items: (0..n)
                .map(|_| MediaGalleryItem {
                    media: MediaItem {
                        url: "attachment://cat.png".to_string(),
                    },
                    ..MediaGalleryItem::default()
                })
                .collect(),
            ..MediaGallery::default()
        })
    }

    fn section(n: usize) -> Component {
        Component::Section(Section {
            id: UniqueId::UNSET,
            components: texts(n),
            accessory: SectionAccessory::Button(Button::link("Docs", "https://example.com")),
        })
    }

    #[test]
    fn legacy_counts_are_bounded() {
        let row = Component::ActionRow(ActionRow {
            id: UniqueId::UNSET,
            components: vec![ActionRowItem::Button(Button::link("Docs", "https://example.com"))],
        });
        let mut embed = Embed::titled("fields");
        embed.fields = (0..26).map(|i| EmbedField::new(format!("n{i}"), "v")).collect();
        let message = Message {
            content: "hi".to_string(),
            embeds: vec![embed],
            components: vec![row; 6],
            ..Message::default()
        };

        let issues = validate(&message);
        assert_eq!(paths(&issues), vec!["embeds.0.fields", "components"]);
        assert!(
            issues
                .iter()
                .all(|issue| issue.message.starts_with("Must contain at most"))
        );
    }

    #[test]
    fn select_menu_holds_at_most_25_options() {
        let menu = SelectMenu {
            options: (0..26)
                .map(|i| SelectMenuOption::new(format!("option {i}")))
                .collect(),
            ..SelectMenu::default()
        };
        let message = Message {
            content: "hi".to_string(),
            components: vec![Component::ActionRow(ActionRow {
                id: UniqueId::UNSET,
                components: vec![ActionRowItem::SelectMenu(menu)],
            })],
            ..Message::default()
        };

        let issues = validate(&message);
        assert_eq!(paths(&issues), vec!["components.0.components.0.options"]);
        assert_eq!(issues[0].message, "Must contain at most 25 items");
    }

    #[test]
    fn v2_root_holds_at_most_ten_components() {
        let message = v2(texts(11).into_iter().map(Component::TextDisplay).collect());
        let issues = validate(&message);
        assert_eq!(paths(&issues), vec!["components"]);
        assert_eq!(issues[0].message, "Must contain at most 10 items");

        let message = v2(texts(10).into_iter().map(Component::TextDisplay).collect());
        assert!(validate(&message).is_empty());
    }

    #[test]
    fn container_children_between_one_and_ten() {
        let full = Container {
            components: texts(11).into_iter().map(ContainerChild::TextDisplay).collect(),
            ..Container::default()
        };
        let message = v2(vec![
            Component::Container(Container::default()),
            Component::Container(full),
        ]);

        let issues = validate(&message);
        assert_eq!(
            paths(&issues),
            vec!["components.0.components", "components.1.components"]
        );
        assert_eq!(issues[0].message, "Must contain at least 1 items");
        assert_eq!(issues[1].message, "Must contain at most 10 items");
    }

    #[test]
    fn section_texts_between_one_and_three() {
        let message = v2(vec![section(0), section(3), section(4)]);
        assert_eq!(
            paths(&validate(&message)),
            vec!["components.0.components", "components.2.components"]
        );
    }

    #[test]
    fn gallery_items_between_one_and_ten() {
        let message = v2(vec![gallery(0), gallery(10), gallery(11)]);
        assert_eq!(
            paths(&validate(&message)),
            vec!["components.0.items", "components.2.items"]
        );
    }

    #[test]
    fn only_component_media_take_any_attachment_name() {
        let mut embed = Embed::titled("pictures");
        embed.image = Some(EmbedMedia {
            url: "attachment://cat.png".to_string(),
        });
        embed.thumbnail = Some(EmbedMedia {
            url: "attachment://cat".to_string(),
        });
        let message = Message {
            embeds: vec![embed],
            ..Message::default()
        };
        assert_eq!(paths(&validate(&message)), vec!["embeds.0.thumbnail.url"]);

        let message = v2(vec![Component::File(FileComponent {
            file: MediaItem {
                url: "attachment://cat".to_string(),
            },
            ..FileComponent::default()
        })]);
        assert!(validate(&message).is_empty());
    }
}
