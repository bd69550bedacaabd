//! # Discord wire format
//!
//! Converts the in-memory [`Message`] to and from the JSON shape Discord's
//! webhook API expects, extended with Embed Generator's `actions` map.
//!
//! ## Formats
//!
//! - [`Format::Webhook`]: what gets sent. Local ids are left out, interactive
//!   buttons carry `custom_id = "action:<set id>"`, select menu options carry
//!   `value = "action:<set id>"` and select menus carry
//!   `custom_id = "action:options:<menu id>"`.
//! - [`Format::Editor`]: what gets stored. Same shape plus the local `id` of
//!   every node and the explicit `action_set_id` of buttons and options, so a
//!   stored document comes back with the same identities.
//!
//! ## Parsing
//!
//! [`json_to_message`] is forgiving: `null` and missing fields take their
//! default, missing ids are generated, action set ids are recovered from
//! `action_set_id` or from the `action:` custom ids, and component kinds that
//! are unknown or misplaced are dropped with a warning. Only JSON that does not
//! fit the shape at all (a string where an object belongs) is an error.
//!
//! Round trip: `json_to_message(message_to_json(m))` equals `m` once local ids
//! are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::{
    Action, ActionRow, ActionRowItem, ActionSet, ActionType, Attachment, Button, ButtonKind,
    ButtonStyle, Component, Container, ContainerChild, Embed, EmbedAuthor, EmbedField, EmbedFooter,
    EmbedMedia, Emoji, FileComponent, IdGenerator, LINK_BUTTON_STYLE, MediaGallery,
    MediaGalleryItem, MediaItem, Message, Section, SectionAccessory, SelectMenu, SelectMenuOption,
    Separator, SeparatorSpacing, TextDisplay, Thumbnail, UniqueId, tags,
};
use crate::normalize::normalize;

const ACTION_PREFIX: &str = "action:";
const OPTIONS_PREFIX: &str = "action:options:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Webhook,
    Editor,
}

/// Treat `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Webhook message payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordMessage {
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub tts: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub flags: u64,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<DiscordEmbed>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DiscordComponent>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, DiscordActionSet>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<DiscordAttachment>,
}

/// Discord embed structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<DiscordFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<DiscordAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<DiscordImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<DiscordImage>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<DiscordField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordFooter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordAuthor {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Image, thumbnail or media reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordImage {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// Key-value field for Discord embeds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordEmoji {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub animated: bool,
}

/// Every component kind in one flat record, discriminated by `type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordComponent {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<DiscordEmoji>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<DiscordSelectOption>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DiscordComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessory: Option<Box<DiscordComponent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<DiscordImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub spoiler: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DiscordGalleryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<DiscordImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divider: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordSelectOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<DiscordEmoji>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub default: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordGalleryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub media: DiscordImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub spoiler: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordActionSet {
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<DiscordAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordAction {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub target_id: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub public: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub allow_role_mentions: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub disable_default_response: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub permissions: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcome of a lenient parse: the message plus everything that was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub message: Message,
    pub warnings: Vec<String>,
}

pub fn message_to_json(message: &Message, format: Format) -> serde_json::Result<Value> {
    serde_json::to_value(to_wire(message, format))
}

pub fn message_to_string(message: &Message, format: Format) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_wire(message, format))
}

pub fn json_to_message(value: Value) -> serde_json::Result<Parsed> {
    let wire: DiscordMessage = serde_json::from_value(value)?;
    Ok(from_wire(wire))
}

pub fn str_to_message(raw: &str) -> serde_json::Result<Parsed> {
    let wire: DiscordMessage = serde_json::from_str(raw)?;
    Ok(from_wire(wire))
}

struct Encoder {
    format: Format,
}

pub fn to_wire(message: &Message, format: Format) -> DiscordMessage {
    let encoder = Encoder { format };
    DiscordMessage {
        content: message.content.clone(),
        username: message.username.clone(),
        avatar_url: message.avatar_url.clone(),
        thread_name: message.thread_name.clone(),
        tts: message.tts,
        flags: message.flags,
        embeds: message.embeds.iter().map(|e| encoder.embed(e)).collect(),
        components: message
            .components
            .iter()
            .map(|c| encoder.component(c))
            .collect(),
        actions: message
            .actions
            .iter()
            .map(|(id, set)| (id.clone(), encoder.action_set(set)))
            .collect(),
        attachments: message
            .attachments
            .iter()
            .map(|a| DiscordAttachment {
                id: encoder.id(a.id),
                name: a.name.clone(),
                size: a.size,
                description: a.description.clone(),
            })
            .collect(),
    }
}

impl Encoder {
    fn id(&self, id: UniqueId) -> Option<u64> {
        match self.format {
            Format::Editor if !id.is_unset() => Some(id.0),
            _ => None,
        }
    }

    fn set_id(&self, set_id: &str) -> Option<String> {
        (self.format == Format::Editor).then(|| set_id.to_string())
    }

    fn embed(&self, embed: &Embed) -> DiscordEmbed {
        DiscordEmbed {
            id: self.id(embed.id),
            title: embed.title.clone(),
            description: embed.description.clone(),
            url: embed.url.clone(),
            timestamp: embed.timestamp.clone(),
            color: embed.color,
            footer: embed.footer.as_ref().map(|f| DiscordFooter {
                text: f.text.clone(),
                icon_url: f.icon_url.clone(),
            }),
            author: embed.author.as_ref().map(|a| DiscordAuthor {
                name: a.name.clone(),
                url: a.url.clone(),
                icon_url: a.icon_url.clone(),
            }),
            image: embed.image.as_ref().map(|m| DiscordImage { url: m.url.clone() }),
            thumbnail: embed
                .thumbnail
                .as_ref()
                .map(|m| DiscordImage { url: m.url.clone() }),
            fields: embed
                .fields
                .iter()
                .map(|f| DiscordField {
                    id: self.id(f.id),
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
        }
    }

    fn component(&self, component: &Component) -> DiscordComponent {
        match component {
            Component::ActionRow(row) => self.action_row(row),
            Component::Section(section) => self.section(section),
            Component::TextDisplay(text) => self.text_display(text),
            Component::MediaGallery(gallery) => self.gallery(gallery),
            Component::File(file) => self.file(file),
            Component::Separator(separator) => self.separator(separator),
            Component::Container(container) => DiscordComponent {
                kind: tags::CONTAINER,
                id: self.id(container.id),
                accent_color: container.accent_color,
                spoiler: container.spoiler,
                components: container
                    .components
                    .iter()
                    .map(|child| self.component(&Component::from(child.clone())))
                    .collect(),
                ..DiscordComponent::default()
            },
        }
    }

    fn action_row(&self, row: &ActionRow) -> DiscordComponent {
        DiscordComponent {
            kind: tags::ACTION_ROW,
            id: self.id(row.id),
            components: row
                .components
                .iter()
                .map(|item| match item {
                    ActionRowItem::Button(button) => self.button(button),
                    ActionRowItem::SelectMenu(menu) => self.select_menu(menu),
                })
                .collect(),
            ..DiscordComponent::default()
        }
    }

    fn button(&self, button: &Button) -> DiscordComponent {
        let mut out = DiscordComponent {
            kind: tags::BUTTON,
            id: self.id(button.id),
            style: Some(button.wire_style()),
            label: Some(button.label.clone()),
            emoji: button.emoji.as_ref().map(emoji_to_wire),
            disabled: button.disabled,
            ..DiscordComponent::default()
        };
        match &button.kind {
            ButtonKind::Interactive { action_set_id, .. } => {
                out.custom_id = Some(format!("{ACTION_PREFIX}{action_set_id}"));
                out.action_set_id = self.set_id(action_set_id);
            }
            ButtonKind::Link { url } => out.url = Some(url.clone()),
        }
        out
    }

    fn select_menu(&self, menu: &SelectMenu) -> DiscordComponent {
        DiscordComponent {
            kind: tags::SELECT_MENU,
            id: self.id(menu.id),
            custom_id: Some(format!("{OPTIONS_PREFIX}{}", menu.id)),
            placeholder: menu.placeholder.clone(),
            min_values: menu.min_values,
            max_values: menu.max_values,
            disabled: menu.disabled,
            options: menu
                .options
                .iter()
                .map(|option| DiscordSelectOption {
                    id: self.id(option.id),
                    label: option.label.clone(),
                    value: Some(format!("{ACTION_PREFIX}{}", option.action_set_id)),
                    action_set_id: self.set_id(&option.action_set_id),
                    description: option.description.clone(),
                    emoji: option.emoji.as_ref().map(emoji_to_wire),
                    default: option.default,
                })
                .collect(),
            ..DiscordComponent::default()
        }
    }

    fn section(&self, section: &Section) -> DiscordComponent {
        let accessory = match &section.accessory {
            SectionAccessory::Button(button) => self.button(button),
            SectionAccessory::Thumbnail(thumbnail) => DiscordComponent {
                kind: tags::THUMBNAIL,
                id: self.id(thumbnail.id),
                media: Some(DiscordImage {
                    url: thumbnail.media.url.clone(),
                }),
                description: thumbnail.description.clone(),
                spoiler: thumbnail.spoiler,
                ..DiscordComponent::default()
            },
        };
        DiscordComponent {
            kind: tags::SECTION,
            id: self.id(section.id),
            components: section
                .components
                .iter()
                .map(|text| self.text_display(text))
                .collect(),
            accessory: Some(Box::new(accessory)),
            ..DiscordComponent::default()
        }
    }

    fn text_display(&self, text: &TextDisplay) -> DiscordComponent {
        DiscordComponent {
            kind: tags::TEXT_DISPLAY,
            id: self.id(text.id),
            content: Some(text.content.clone()),
            ..DiscordComponent::default()
        }
    }

    fn gallery(&self, gallery: &MediaGallery) -> DiscordComponent {
        DiscordComponent {
            kind: tags::MEDIA_GALLERY,
            id: self.id(gallery.id),
            items: gallery
                .items
                .iter()
                .map(|item| DiscordGalleryItem {
                    id: self.id(item.id),
                    media: DiscordImage {
                        url: item.media.url.clone(),
                    },
                    description: item.description.clone(),
                    spoiler: item.spoiler,
                })
                .collect(),
            ..DiscordComponent::default()
        }
    }

    fn file(&self, file: &FileComponent) -> DiscordComponent {
        DiscordComponent {
            kind: tags::FILE,
            id: self.id(file.id),
            file: Some(DiscordImage {
                url: file.file.url.clone(),
            }),
            spoiler: file.spoiler,
            ..DiscordComponent::default()
        }
    }

    fn separator(&self, separator: &Separator) -> DiscordComponent {
        DiscordComponent {
            kind: tags::SEPARATOR,
            id: self.id(separator.id),
            divider: Some(separator.divider),
            spacing: Some(separator.spacing.wire_value()),
            ..DiscordComponent::default()
        }
    }

    fn action_set(&self, set: &ActionSet) -> DiscordActionSet {
        DiscordActionSet {
            actions: set
                .actions
                .iter()
                .map(|action| DiscordAction {
                    kind: action.kind.wire_value(),
                    id: self.id(action.id),
                    text: action.text.clone(),
                    target_id: action.target_id.clone(),
                    public: action.public,
                    allow_role_mentions: action.allow_role_mentions,
                    disable_default_response: action.disable_default_response,
                    permissions: action.permissions.clone(),
                    role_ids: action.role_ids.clone(),
                })
                .collect(),
        }
    }
}

fn emoji_to_wire(emoji: &Emoji) -> DiscordEmoji {
    DiscordEmoji {
        id: emoji.id.clone(),
        name: emoji.name.clone(),
        animated: emoji.animated,
    }
}

fn emoji_from_wire(emoji: DiscordEmoji) -> Emoji {
    Emoji {
        id: emoji.id,
        name: emoji.name,
        animated: emoji.animated,
    }
}

/// Build a normalized message from the wire shape. Never fails; anything it
/// cannot place is reported in [`Parsed::warnings`].
pub fn from_wire(wire: DiscordMessage) -> Parsed {
    let mut decoder = Decoder::default();
    let mut message = Message {
        content: wire.content,
        username: wire.username,
        avatar_url: wire.avatar_url,
        thread_name: wire.thread_name,
        tts: wire.tts,
        flags: wire.flags,
        embeds: wire.embeds.into_iter().map(embed_from_wire).collect(),
        components: Vec::new(),
        actions: BTreeMap::new(),
        attachments: wire
            .attachments
            .into_iter()
            .map(|a| Attachment {
                id: local_id(a.id),
                name: a.name,
                size: a.size,
                description: a.description,
            })
            .collect(),
    };

    for (i, raw) in wire.components.into_iter().enumerate() {
        if let Some(component) = decoder.component(raw, &format!("components.{i}")) {
            message.components.push(component);
        }
    }
    for (set_id, raw) in wire.actions {
        let set = decoder.action_set(raw, &format!("actions.{set_id}"));
        message.actions.insert(set_id, set);
    }

    let mut ids = IdGenerator::for_message(&message);
    normalize(&mut message, &mut ids);

    Parsed {
        message,
        warnings: decoder.warnings,
    }
}

fn local_id(id: Option<u64>) -> UniqueId {
    id.map_or(UniqueId::UNSET, UniqueId)
}

/// Strip the `action:` prefix from a custom id, ignoring select menu ids.
fn action_set_from_custom_id(custom_id: Option<&str>) -> Option<String> {
    let custom_id = custom_id?;
    if custom_id.starts_with(OPTIONS_PREFIX) {
        return None;
    }
    custom_id.strip_prefix(ACTION_PREFIX).map(str::to_string)
}

fn embed_from_wire(embed: DiscordEmbed) -> Embed {
    Embed {
        id: local_id(embed.id),
        title: embed.title,
        description: embed.description,
        url: embed.url,
        timestamp: embed.timestamp,
        color: embed.color,
        footer: embed.footer.map(|f| EmbedFooter {
            text: f.text,
            icon_url: f.icon_url,
        }),
        author: embed.author.map(|a| EmbedAuthor {
            name: a.name,
            url: a.url,
            icon_url: a.icon_url,
        }),
        image: embed.image.map(|m| EmbedMedia { url: m.url }),
        thumbnail: embed.thumbnail.map(|m| EmbedMedia { url: m.url }),
        fields: embed
            .fields
            .into_iter()
            .map(|f| EmbedField {
                id: local_id(f.id),
                name: f.name,
                value: f.value,
                inline: f.inline,
            })
            .collect(),
    }
}

#[derive(Default)]
struct Decoder {
    warnings: Vec<String>,
}

impl Decoder {
    fn skip(&mut self, path: &str, reason: &str) {
        warn!("Dropping {path}: {reason}");
        self.warnings.push(format!("{path}: {reason}"));
    }

    fn component(&mut self, raw: DiscordComponent, path: &str) -> Option<Component> {
        match raw.kind {
            tags::CONTAINER => {
                let id = local_id(raw.id);
                let mut children = Vec::new();
                for (j, child) in raw.components.into_iter().enumerate() {
                    let child_path = format!("{path}.components.{j}");
                    if child.kind == tags::CONTAINER {
                        self.skip(&child_path, "containers can not be nested");
                        continue;
                    }
                    if let Some(component) = self.component(child, &child_path)
                        && let Ok(child) = ContainerChild::try_from(component)
                    {
                        children.push(child);
                    }
                }
                Some(Component::Container(Container {
                    id,
                    accent_color: raw.accent_color,
                    spoiler: raw.spoiler,
                    components: children,
                }))
            }
            tags::ACTION_ROW => Some(Component::ActionRow(self.action_row(raw, path))),
            tags::SECTION => self.section(raw, path).map(Component::Section),
            tags::TEXT_DISPLAY => Some(Component::TextDisplay(text_display(raw))),
            tags::MEDIA_GALLERY => Some(Component::MediaGallery(MediaGallery {
                id: local_id(raw.id),
                items: raw
                    .items
                    .into_iter()
                    .map(|item| MediaGalleryItem {
                        id: local_id(item.id),
                        media: MediaItem {
                            url: item.media.url,
                        },
                        description: item.description,
                        spoiler: item.spoiler,
                    })
                    .collect(),
            })),
            tags::FILE => Some(Component::File(FileComponent {
                id: local_id(raw.id),
                file: MediaItem {
                    url: raw.file.map(|f| f.url).unwrap_or_default(),
                },
                spoiler: raw.spoiler,
            })),
            tags::SEPARATOR => Some(Component::Separator(Separator {
                id: local_id(raw.id),
                divider: raw.divider.unwrap_or(true),
                spacing: raw
                    .spacing
                    .map(SeparatorSpacing::from_wire)
                    .unwrap_or_default(),
            })),
            other => {
                self.skip(path, &format!("unknown component type {other}"));
                None
            }
        }
    }

    fn action_row(&mut self, raw: DiscordComponent, path: &str) -> ActionRow {
        let mut row = ActionRow {
            id: local_id(raw.id),
            components: Vec::new(),
        };
        for (j, item) in raw.components.into_iter().enumerate() {
            let item_path = format!("{path}.components.{j}");
            match item.kind {
                tags::BUTTON => row.components.push(ActionRowItem::Button(self.button(item))),
                tags::SELECT_MENU => row
                    .components
                    .push(ActionRowItem::SelectMenu(select_menu(item))),
                other => self.skip(&item_path, &format!("type {other} can not be placed in an action row")),
            }
        }
        row
    }

    fn button(&mut self, raw: DiscordComponent) -> Button {
        let is_link = raw.style == Some(LINK_BUTTON_STYLE) || raw.url.is_some();
        let kind = if is_link {
            ButtonKind::Link {
                url: raw.url.unwrap_or_default(),
            }
        } else {
            let style = raw
                .style
                .and_then(ButtonStyle::from_wire)
                .unwrap_or_default();
            let action_set_id = raw
                .action_set_id
                .filter(|id| !id.is_empty())
                .or_else(|| action_set_from_custom_id(raw.custom_id.as_deref()))
                .unwrap_or_default();
            ButtonKind::Interactive {
                style,
                action_set_id,
            }
        };
        Button {
            id: local_id(raw.id),
            label: raw.label.unwrap_or_default(),
            emoji: raw.emoji.map(emoji_from_wire),
            disabled: raw.disabled,
            kind,
        }
    }

    fn section(&mut self, raw: DiscordComponent, path: &str) -> Option<Section> {
        let accessory = match raw.accessory.map(|a| *a) {
            Some(accessory) if accessory.kind == tags::BUTTON => {
                SectionAccessory::Button(self.button(accessory))
            }
            Some(accessory) if accessory.kind == tags::THUMBNAIL => {
                SectionAccessory::Thumbnail(Thumbnail {
                    id: local_id(accessory.id),
                    media: MediaItem {
                        url: accessory.media.map(|m| m.url).unwrap_or_default(),
                    },
                    description: accessory.description,
                    spoiler: accessory.spoiler,
                })
            }
            Some(accessory) => {
                self.skip(path, &format!("unsupported accessory type {}", accessory.kind));
                return None;
            }
            None => {
                self.skip(path, "section without accessory");
                return None;
            }
        };

        let mut texts = Vec::new();
        for (j, child) in raw.components.into_iter().enumerate() {
            if child.kind == tags::TEXT_DISPLAY {
                texts.push(text_display(child));
            } else {
                self.skip(
                    &format!("{path}.components.{j}"),
                    "sections can only hold text displays",
                );
            }
        }
        Some(Section {
            id: local_id(raw.id),
            components: texts,
            accessory,
        })
    }

    fn action_set(&mut self, raw: DiscordActionSet, path: &str) -> ActionSet {
        let mut set = ActionSet::default();
        for (i, action) in raw.actions.into_iter().enumerate() {
            let Some(kind) = ActionType::from_wire(action.kind) else {
                self.skip(
                    &format!("{path}.actions.{i}"),
                    &format!("unknown action type {}", action.kind),
                );
                continue;
            };
            set.actions.push(Action {
                id: local_id(action.id),
                kind,
                text: action.text,
                target_id: action.target_id,
                public: action.public,
                allow_role_mentions: action.allow_role_mentions,
                disable_default_response: action.disable_default_response,
                permissions: action.permissions,
                role_ids: action.role_ids,
            });
        }
        set
    }
}

fn text_display(raw: DiscordComponent) -> TextDisplay {
    TextDisplay {
        id: local_id(raw.id),
        content: raw.content.unwrap_or_default(),
    }
}

fn select_menu(raw: DiscordComponent) -> SelectMenu {
    SelectMenu {
        id: local_id(raw.id),
        placeholder: raw.placeholder,
        min_values: raw.min_values,
        max_values: raw.max_values,
        disabled: raw.disabled,
        options: raw
            .options
            .into_iter()
            .map(|option| SelectMenuOption {
                id: local_id(option.id),
                label: option.label,
                description: option.description,
                emoji: option.emoji.map(emoji_from_wire),
                default: option.default,
                action_set_id: option
                    .action_set_id
                    .filter(|id| !id.is_empty())
                    .or_else(|| action_set_from_custom_id(option.value.as_deref()))
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::FLAG_COMPONENTS_V2;
    use crate::templates::default_message;

    fn sample() -> Message {
        let mut message = Message {
            content: "hello".to_string(),
            username: Some("Bot".to_string()),
            ..Message::default()
        };
        message.embeds.push(Embed {
            title: Some("Title".to_string()),
            color: Some(0x58_65F2),
            fields: vec![EmbedField::new("a", "b")],
            ..Embed::default()
        });
        message.components.push(Component::ActionRow(ActionRow {
            id: UniqueId::UNSET,
            components: vec![
                ActionRowItem::Button(Button::interactive("Go", ButtonStyle::Success)),
                ActionRowItem::Button(Button::link("Docs", "https://example.com")),
            ],
        }));
        let mut ids = IdGenerator::default();
        normalize(&mut message, &mut ids);
        let set_id = message.referenced_action_sets()[0].clone();
        if let Some(set) = message.actions.get_mut(&set_id) {
            set.actions.push(Action {
                id: ids.next_id(),
                ..Action::text_response("hi")
            });
        }
        message
    }

    #[test]
    fn webhook_format_uses_custom_ids() {
        let message = sample();
        let set_id = message.referenced_action_sets()[0].clone();
        let json = message_to_json(&message, Format::Webhook).unwrap();

        let button = &json["components"][0]["components"][0];
        assert_eq!(button["custom_id"], json!(format!("action:{set_id}")));
        assert!(button.get("id").is_none());
        assert!(button.get("action_set_id").is_none());
        assert_eq!(json["components"][0]["components"][1]["style"], json!(5));
        assert!(json["embeds"][0].get("id").is_none());
        assert_eq!(json["actions"][&set_id]["actions"][0]["text"], json!("hi"));
        assert!(json.get("flags").is_none());
    }

    #[test]
    fn webhook_round_trip_ignores_ids() {
        let message = sample();
        let json = message_to_json(&message, Format::Webhook).unwrap();
        let parsed = json_to_message(json).unwrap();

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.message.without_ids(), message.without_ids());
    }

    #[test]
    fn editor_round_trip_keeps_ids() {
        let message = default_message();
        let json = message_to_json(&message, Format::Editor).unwrap();
        let parsed = json_to_message(json).unwrap();
        assert_eq!(parsed.message, message);
    }

    #[test]
    fn null_fields_take_defaults() {
        let parsed = json_to_message(json!({
            "content": null,
            "tts": null,
            "embeds": [{ "title": "x", "fields": null, "id": null }],
            "components": null,
            "actions": null
        }))
        .unwrap();

        let message = parsed.message;
        assert!(message.content.is_empty());
        assert_eq!(message.embeds.len(), 1);
        assert!(!message.embeds[0].id.is_unset());
    }

    #[test]
    fn unknown_components_are_dropped_with_warning() {
        let parsed = json_to_message(json!({
            "components": [
                { "type": 99 },
                { "type": 1, "components": [{ "type": 4 }, { "type": 2, "label": "ok", "style": 1 }] }
            ]
        }))
        .unwrap();

        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.message.components.len(), 1);
        assert_eq!(parsed.message.referenced_action_sets().len(), 1);
        assert_eq!(parsed.message.actions.len(), 1);
    }

    #[test]
    fn action_sets_recovered_from_custom_ids() {
        let parsed = json_to_message(json!({
            "components": [{
                "type": 1,
                "components": [{
                    "type": 3,
                    "custom_id": "action:options:5",
                    "options": [{ "label": "one", "value": "action:42" }]
                }]
            }],
            "actions": { "42": { "actions": [{ "type": 1, "text": "picked" }] } }
        }))
        .unwrap();

        let Component::ActionRow(row) = &parsed.message.components[0] else {
            panic!("expected action row");
        };
        let ActionRowItem::SelectMenu(menu) = &row.components[0] else {
            panic!("expected select menu");
        };
        assert_eq!(menu.options[0].action_set_id, "42");
        assert_eq!(parsed.message.actions["42"].actions[0].text, "picked");
    }

    #[test]
    fn nested_container_is_dropped() {
        let parsed = json_to_message(json!({
            "flags": FLAG_COMPONENTS_V2,
            "components": [{
                "type": 17,
                "components": [
                    { "type": 17 },
                    { "type": 10, "content": "inside" }
                ]
            }]
        }))
        .unwrap();

        let Component::Container(container) = &parsed.message.components[0] else {
            panic!("expected container");
        };
        assert_eq!(container.components.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn wrong_shape_is_an_error() {
        assert!(json_to_message(json!({ "embeds": "nope" })).is_err());
    }
}
