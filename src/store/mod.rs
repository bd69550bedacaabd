//! The message document store.
//!
//! [`MessageStore`] owns the document, the id generator and the undo
//! history. Every mutation is a [`Command`]; after it runs, the document is
//! normalized and, if anything changed, the previous state is handed to the
//! history.

mod command;
mod path;

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::debug;

pub use command::{ActionEdit, Command, EmbedEdit, FieldEdit, NodeEdit};
pub use path::{ChildrenMut, Node, NodeMut, NodePath, NodeRef, Step};

use crate::history::{History, HistoryConfig, Tracking};
use crate::models::{
    Action, ActionRow, ActionSet, ActionType, Attachment, Button, ButtonKind, Component,
    Container, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia, FLAG_COMPONENTS_V2,
    FileComponent, IdGenerator, MediaGallery, MediaGalleryItem, Message, Section, SelectMenu,
    SelectMenuOption, Separator, TextDisplay, Thumbnail, TreeNode, UniqueId,
};
use crate::normalize::normalize;
use crate::templates;

pub struct MessageStore {
    message: Message,
    ids: IdGenerator,
    history: History<Message>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(templates::default_message(), HistoryConfig::default())
    }
}

impl MessageStore {
    pub fn new(mut message: Message, config: HistoryConfig) -> Self {
        let mut ids = IdGenerator::for_message(&message);
        normalize(&mut message, &mut ids);
        Self {
            message,
            ids,
            history: History::new(config),
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn apply(&mut self, command: Command) -> bool {
        self.apply_at(command, Instant::now())
    }

    /// Run `command` as if it happened at `now`. Returns whether the document
    /// changed; unchanged documents leave the history alone.
    pub fn apply_at(&mut self, command: Command, now: Instant) -> bool {
        let before = self.message.clone();
        self.execute(command);
        normalize(&mut self.message, &mut self.ids);

        if self.message == before {
            return false;
        }
        self.history.record(before, now);
        true
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::SetContent(content) => self.message.content = content,
            Command::SetUsername(username) => self.message.username = username,
            Command::SetAvatarUrl(url) => self.message.avatar_url = url,
            Command::SetThreadName(name) => self.message.thread_name = name,
            Command::SetTts(tts) => self.message.tts = tts,
            Command::SetComponentsV2(enabled) => self.switch_layout(enabled),

            Command::AddEmbed(mut embed) => {
                embed.ids_mut(&mut |id| *id = UniqueId::UNSET);
                self.message.embeds.push(embed);
            }
            Command::DuplicateEmbed(index) => {
                if let Some(source) = self.message.embeds.get(index) {
                    let mut copy = source.clone();
                    copy.ids_mut(&mut |id| *id = self.ids.next_id());
                    self.message.embeds.insert(index + 1, copy);
                }
            }
            Command::DeleteEmbed(index) => {
                remove_at(&mut self.message.embeds, index);
            }
            Command::MoveEmbedUp(index) => {
                move_up(&mut self.message.embeds, index);
            }
            Command::MoveEmbedDown(index) => {
                move_down(&mut self.message.embeds, index);
            }
            Command::ClearEmbeds => self.message.embeds.clear(),
            Command::EditEmbed { embed, edit } => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    edit_embed(embed, edit);
                }
            }

            Command::AddEmbedField { embed, mut field } => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    field.id = UniqueId::UNSET;
                    embed.fields.push(field);
                }
            }
            Command::EditEmbedField { embed, field, edit } => {
                if let Some(field) = self
                    .message
                    .embeds
                    .get_mut(embed)
                    .and_then(|e| e.fields.get_mut(field))
                {
                    match edit {
                        FieldEdit::Name(name) => field.name = name,
                        FieldEdit::Value(value) => field.value = value,
                        FieldEdit::Inline(inline) => field.inline = inline,
                    }
                }
            }
            Command::MoveEmbedFieldUp { embed, field } => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    move_up(&mut embed.fields, field);
                }
            }
            Command::MoveEmbedFieldDown { embed, field } => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    move_down(&mut embed.fields, field);
                }
            }
            Command::DeleteEmbedField { embed, field } => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    remove_at(&mut embed.fields, field);
                }
            }
            Command::DuplicateEmbedField { embed, field } => {
                if let Some(embed) = self.message.embeds.get_mut(embed)
                    && let Some(source) = embed.fields.get(field)
                {
                    let copy = EmbedField {
                        id: self.ids.next_id(),
                        ..source.clone()
                    };
                    embed.fields.insert(field + 1, copy);
                }
            }
            Command::ClearEmbedFields(embed) => {
                if let Some(embed) = self.message.embeds.get_mut(embed) {
                    embed.fields.clear();
                }
            }

            Command::AddNode { parent, node } => self.insert_node(&parent, node),
            Command::MoveNodeUp(path) => {
                if let Some((parent, index)) = path.split_last()
                    && let Some(children) = path::children_mut(&mut self.message.components, &parent)
                {
                    children.move_up(index);
                }
            }
            Command::MoveNodeDown(path) => {
                if let Some((parent, index)) = path.split_last()
                    && let Some(children) = path::children_mut(&mut self.message.components, &parent)
                {
                    children.move_down(index);
                }
            }
            Command::DeleteNode(path) => {
                if let Some((parent, index)) = path.split_last()
                    && let Some(children) = path::children_mut(&mut self.message.components, &parent)
                {
                    children.remove(index);
                }
            }
            Command::DuplicateNode(path) => self.copy_node(&path),
            Command::ClearChildren(parent) => {
                if let Some(children) = path::children_mut(&mut self.message.components, &parent) {
                    children.clear();
                }
            }
            Command::EditNode { path, edit } => {
                if let Some(node) = path::resolve_mut(&mut self.message.components, &path) {
                    edit_node(node, edit);
                }
            }

            Command::AddAttachment(mut attachment) => {
                attachment.id = UniqueId::UNSET;
                self.message.attachments.push(attachment);
            }
            Command::RemoveAttachment(index) => {
                remove_at(&mut self.message.attachments, index);
            }
            Command::MoveAttachmentUp(index) => {
                move_up(&mut self.message.attachments, index);
            }
            Command::MoveAttachmentDown(index) => {
                move_down(&mut self.message.attachments, index);
            }
            Command::SetAttachmentName { attachment, name } => {
                if let Some(attachment) = self.message.attachments.get_mut(attachment) {
                    attachment.name = name;
                }
            }
            Command::ClearAttachments => self.message.attachments.clear(),

            Command::AddAction { set, mut action } => {
                if let Some(set) = self.message.actions.get_mut(&set) {
                    action.id = UniqueId::UNSET;
                    set.actions.push(action);
                }
            }
            Command::ClearActions(set) => {
                if let Some(set) = self.message.actions.get_mut(&set) {
                    set.actions.clear();
                }
            }
            Command::DeleteAction { set, action } => {
                if let Some(set) = self.message.actions.get_mut(&set) {
                    remove_at(&mut set.actions, action);
                }
            }
            Command::MoveActionUp { set, action } => {
                if let Some(set) = self.message.actions.get_mut(&set) {
                    move_up(&mut set.actions, action);
                }
            }
            Command::MoveActionDown { set, action } => {
                if let Some(set) = self.message.actions.get_mut(&set) {
                    move_down(&mut set.actions, action);
                }
            }
            Command::DuplicateAction { set, action } => {
                if let Some(set) = self.message.actions.get_mut(&set)
                    && let Some(source) = set.actions.get(action)
                {
                    let copy = Action {
                        id: self.ids.next_id(),
                        ..source.clone()
                    };
                    set.actions.insert(action + 1, copy);
                }
            }
            Command::EditAction { set, action, edit } => {
                if let Some(action) = self
                    .message
                    .actions
                    .get_mut(&set)
                    .and_then(|s| s.actions.get_mut(action))
                {
                    edit_action(action, edit);
                }
            }

            Command::Clear => self.message = templates::empty_message(),
            Command::Reset => {
                self.message = templates::default_message();
                self.ids.observe(&self.message);
            }
            Command::Replace(message) => {
                self.message = *message;
                self.ids.observe(&self.message);
            }
        }
    }

    /// Switching on wipes everything Components V2 cannot carry; switching
    /// off brings back the welcome template. The webhook identity and the
    /// attachments survive both ways.
    fn switch_layout(&mut self, enabled: bool) {
        if enabled == self.message.components_v2_enabled() {
            return;
        }

        if enabled {
            let message = &mut self.message;
            message.content.clear();
            message.embeds.clear();
            message.components.clear();
            message.actions.clear();
            message.flags = FLAG_COMPONENTS_V2;
        } else {
            let previous = std::mem::take(&mut self.message);
            self.message = Message {
                username: previous.username,
                avatar_url: previous.avatar_url,
                thread_name: previous.thread_name,
                tts: previous.tts,
                attachments: previous.attachments,
                ..templates::default_message()
            };
            self.ids.observe(&self.message);
        }
        debug!("Components V2 layout enabled: {enabled}");
    }

    /// New nodes always start with fresh ids and fresh, empty action sets.
    fn insert_node(&mut self, parent: &NodePath, mut node: Node) {
        node.ids_mut(&mut |id| *id = UniqueId::UNSET);
        node.action_set_ids_mut(&mut String::clear);

        if let Some(children) = path::children_mut(&mut self.message.components, parent)
            && children.accepts(&node)
        {
            children.push(node);
        }
    }

    fn copy_node(&mut self, path: &NodePath) {
        let Some((parent, index)) = path.split_last() else {
            return;
        };
        let Some(source) = path::resolve(&self.message.components, path).map(NodeRef::to_node)
        else {
            return;
        };

        let Message {
            components,
            actions,
            ..
        } = &mut self.message;
        let ids = &mut self.ids;
        if let Some(children) = path::children_mut(components, &parent)
            && children.accepts(&source)
        {
            children.duplicate(index, &mut |copy| refresh_identities(copy, ids, actions));
        }
    }

    pub fn undo(&mut self, steps: usize) -> usize {
        self.history.undo(&mut self.message, steps)
    }

    pub fn redo(&mut self, steps: usize) -> usize {
        self.history.redo(&mut self.message, steps)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn pause_history(&mut self) {
        self.history.pause();
    }

    pub fn resume_history(&mut self) {
        self.history.resume();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history_tracking(&self) -> Tracking {
        self.history.tracking()
    }

    pub fn history(&self) -> &History<Message> {
        &self.history
    }
}

/// Give a copied subtree new node ids and new action sets holding copies of
/// the original actions.
fn refresh_identities(
    node: &mut dyn TreeNode,
    ids: &mut IdGenerator,
    actions: &mut BTreeMap<String, ActionSet>,
) {
    node.ids_mut(&mut |id| *id = ids.next_id());
    node.action_set_ids_mut(&mut |set_id| {
        let mut copy = actions.get(set_id.as_str()).cloned().unwrap_or_default();
        for action in &mut copy.actions {
            action.id = ids.next_id();
        }
        let fresh = ids.next_action_set_id();
        actions.insert(fresh.clone(), copy);
        *set_id = fresh;
    });
}

fn remove_at<T>(list: &mut Vec<T>, index: usize) -> bool {
    if index < list.len() {
        list.remove(index);
        true
    } else {
        false
    }
}

fn move_up<T>(list: &mut [T], index: usize) -> bool {
    if index == 0 || index >= list.len() {
        return false;
    }
    list.swap(index, index - 1);
    true
}

fn move_down<T>(list: &mut [T], index: usize) -> bool {
    if index >= list.len().saturating_sub(1) {
        return false;
    }
    list.swap(index, index + 1);
    true
}

fn edit_embed(embed: &mut Embed, edit: EmbedEdit) {
    match edit {
        EmbedEdit::Title(title) => embed.title = title,
        EmbedEdit::Description(description) => embed.description = description,
        EmbedEdit::Url(url) => embed.url = url,
        EmbedEdit::Timestamp(timestamp) => embed.timestamp = timestamp,
        EmbedEdit::Color(color) => embed.color = color,
        EmbedEdit::AuthorName(name) => author(embed).name = name,
        EmbedEdit::AuthorUrl(url) => author(embed).url = url,
        EmbedEdit::AuthorIconUrl(url) => author(embed).icon_url = url,
        EmbedEdit::FooterText(text) => footer(embed).text = text,
        EmbedEdit::FooterIconUrl(url) => footer(embed).icon_url = url,
        EmbedEdit::ImageUrl(url) => embed.image = url.map(|url| EmbedMedia { url }),
        EmbedEdit::ThumbnailUrl(url) => embed.thumbnail = url.map(|url| EmbedMedia { url }),
    }
}

// Empty author and footer objects are collapsed again by normalize.
fn author(embed: &mut Embed) -> &mut EmbedAuthor {
    embed.author.get_or_insert_with(EmbedAuthor::default)
}

fn footer(embed: &mut Embed) -> &mut EmbedFooter {
    embed.footer.get_or_insert_with(EmbedFooter::default)
}

fn edit_node(node: NodeMut<'_>, edit: NodeEdit) {
    match (node, edit) {
        (NodeMut::Button(button), NodeEdit::Label(label)) => button.label = label,
        (NodeMut::SelectMenuOption(option), NodeEdit::Label(label)) => option.label = label,

        (NodeMut::Button(button), NodeEdit::Style(style)) => match &mut button.kind {
            ButtonKind::Interactive { style: current, .. } => *current = style,
            ButtonKind::Link { .. } => {
                button.kind = ButtonKind::Interactive {
                    style,
                    action_set_id: String::new(),
                }
            }
        },
        (NodeMut::Button(button), NodeEdit::Url(url)) => match &mut button.kind {
            ButtonKind::Link { url: current } => *current = url,
            ButtonKind::Interactive { .. } => button.kind = ButtonKind::Link { url },
        },

        (NodeMut::Button(button), NodeEdit::Disabled(disabled)) => button.disabled = disabled,
        (NodeMut::SelectMenu(menu), NodeEdit::Disabled(disabled)) => menu.disabled = disabled,

        (NodeMut::Button(button), NodeEdit::Emoji(emoji)) => button.emoji = emoji,
        (NodeMut::SelectMenuOption(option), NodeEdit::Emoji(emoji)) => option.emoji = emoji,

        (NodeMut::SelectMenu(menu), NodeEdit::Placeholder(placeholder)) => {
            menu.placeholder = placeholder
        }
        (NodeMut::SelectMenu(menu), NodeEdit::MinValues(min)) => menu.min_values = min,
        (NodeMut::SelectMenu(menu), NodeEdit::MaxValues(max)) => menu.max_values = max,

        (NodeMut::SelectMenuOption(option), NodeEdit::Description(description)) => {
            option.description = description
        }
        (NodeMut::MediaGalleryItem(item), NodeEdit::Description(description)) => {
            item.description = description
        }
        (NodeMut::Thumbnail(thumbnail), NodeEdit::Description(description)) => {
            thumbnail.description = description
        }
        (NodeMut::SelectMenuOption(option), NodeEdit::Default(default)) => {
            option.default = default
        }

        (NodeMut::TextDisplay(text), NodeEdit::Content(content)) => text.content = content,

        (NodeMut::Thumbnail(thumbnail), NodeEdit::MediaUrl(url)) => thumbnail.media.url = url,
        (NodeMut::MediaGalleryItem(item), NodeEdit::MediaUrl(url)) => item.media.url = url,
        (NodeMut::File(file), NodeEdit::MediaUrl(url)) => file.file.url = url,

        (NodeMut::Thumbnail(thumbnail), NodeEdit::Spoiler(spoiler)) => thumbnail.spoiler = spoiler,
        (NodeMut::MediaGalleryItem(item), NodeEdit::Spoiler(spoiler)) => item.spoiler = spoiler,
        (NodeMut::File(file), NodeEdit::Spoiler(spoiler)) => file.spoiler = spoiler,
        (NodeMut::Container(container), NodeEdit::Spoiler(spoiler)) => {
            container.spoiler = spoiler
        }

        (NodeMut::Separator(separator), NodeEdit::Divider(divider)) => {
            separator.divider = divider
        }
        (NodeMut::Separator(separator), NodeEdit::Spacing(spacing)) => {
            separator.spacing = spacing
        }
        (NodeMut::Container(container), NodeEdit::AccentColor(color)) => {
            container.accent_color = color
        }

        (NodeMut::Section(section), NodeEdit::Accessory(node)) => {
            let mut node = *node;
            node.ids_mut(&mut |id| *id = UniqueId::UNSET);
            node.action_set_ids_mut(&mut String::clear);
            if let Some(accessory) = node.into_accessory() {
                section.accessory = accessory;
            }
        }

        _ => {}
    }
}

fn edit_action(action: &mut Action, edit: ActionEdit) {
    match edit {
        ActionEdit::Type(kind) => *action = Action::of_type(kind, action.id),
        ActionEdit::Text(text) => {
            if action.accepts_text() {
                action.text = text;
            }
        }
        ActionEdit::TargetId(target) => {
            if action.accepts_target() {
                action.target_id = target;
            }
        }
        ActionEdit::Public(public) => {
            if action.accepts_public() {
                action.public = public;
            }
        }
        ActionEdit::DisableDefaultResponse(disable) => {
            if action.accepts_disable_default_response() {
                action.disable_default_response = disable;
            }
        }
        ActionEdit::Permissions(permissions) => {
            if action.kind == ActionType::PermissionCheck {
                action.permissions = permissions;
            }
        }
        ActionEdit::RoleIds(role_ids) => {
            if action.kind == ActionType::PermissionCheck {
                action.role_ids = role_ids;
            }
        }
    }
}

macro_rules! typed_accessor {
    ($($name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $name(&self, path: &NodePath) -> Option<&$ty> {
                match self.node(path)? {
                    NodeRef::$variant(node) => Some(node),
                    _ => None,
                }
            }
        )*
    };
}

/// Reads.
impl MessageStore {
    pub fn components_v2_enabled(&self) -> bool {
        self.message.components_v2_enabled()
    }

    pub fn embed(&self, index: usize) -> Option<&Embed> {
        self.message.embeds.get(index)
    }

    pub fn embed_field(&self, embed: usize, field: usize) -> Option<&EmbedField> {
        self.embed(embed)?.fields.get(field)
    }

    pub fn attachment(&self, index: usize) -> Option<&Attachment> {
        self.message.attachments.get(index)
    }

    pub fn action_set(&self, id: &str) -> Option<&ActionSet> {
        self.message.actions.get(id)
    }

    pub fn node(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        path::resolve(&self.message.components, path)
    }

    typed_accessor! {
        action_row => ActionRow(ActionRow),
        button => Button(Button),
        select_menu => SelectMenu(SelectMenu),
        select_menu_option => SelectMenuOption(SelectMenuOption),
        section => Section(Section),
        text_display => TextDisplay(TextDisplay),
        thumbnail => Thumbnail(Thumbnail),
        gallery => MediaGallery(MediaGallery),
        gallery_item => MediaGalleryItem(MediaGalleryItem),
        file => File(FileComponent),
        separator => Separator(Separator),
        container => Container(Container),
    }
}

/// Named shorthands for the individual commands.
impl MessageStore {
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        self.apply(Command::SetContent(content.into()))
    }

    pub fn set_username(&mut self, username: Option<String>) -> bool {
        self.apply(Command::SetUsername(username))
    }

    pub fn set_avatar_url(&mut self, url: Option<String>) -> bool {
        self.apply(Command::SetAvatarUrl(url))
    }

    pub fn set_thread_name(&mut self, name: Option<String>) -> bool {
        self.apply(Command::SetThreadName(name))
    }

    pub fn set_components_v2_enabled(&mut self, enabled: bool) -> bool {
        self.apply(Command::SetComponentsV2(enabled))
    }

    pub fn clear(&mut self) -> bool {
        self.apply(Command::Clear)
    }

    pub fn reset(&mut self) -> bool {
        self.apply(Command::Reset)
    }

    pub fn replace(&mut self, message: Message) -> bool {
        self.apply(Command::Replace(Box::new(message)))
    }

    pub fn add_embed(&mut self, embed: Embed) -> bool {
        self.apply(Command::AddEmbed(embed))
    }

    pub fn clear_embeds(&mut self) -> bool {
        self.apply(Command::ClearEmbeds)
    }

    pub fn move_embed_up(&mut self, index: usize) -> bool {
        self.apply(Command::MoveEmbedUp(index))
    }

    pub fn move_embed_down(&mut self, index: usize) -> bool {
        self.apply(Command::MoveEmbedDown(index))
    }

    pub fn duplicate_embed(&mut self, index: usize) -> bool {
        self.apply(Command::DuplicateEmbed(index))
    }

    pub fn delete_embed(&mut self, index: usize) -> bool {
        self.apply(Command::DeleteEmbed(index))
    }

    pub fn edit_embed(&mut self, embed: usize, edit: EmbedEdit) -> bool {
        self.apply(Command::EditEmbed { embed, edit })
    }

    pub fn set_embed_title(&mut self, embed: usize, title: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::Title(title))
    }

    pub fn set_embed_description(&mut self, embed: usize, description: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::Description(description))
    }

    pub fn set_embed_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::Url(url))
    }

    pub fn set_embed_timestamp(&mut self, embed: usize, timestamp: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::Timestamp(timestamp))
    }

    pub fn set_embed_color(&mut self, embed: usize, color: Option<u32>) -> bool {
        self.edit_embed(embed, EmbedEdit::Color(color))
    }

    pub fn set_embed_author_name(&mut self, embed: usize, name: impl Into<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::AuthorName(name.into()))
    }

    pub fn set_embed_author_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::AuthorUrl(url))
    }

    pub fn set_embed_author_icon_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::AuthorIconUrl(url))
    }

    pub fn set_embed_footer_text(&mut self, embed: usize, text: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::FooterText(text))
    }

    pub fn set_embed_footer_icon_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::FooterIconUrl(url))
    }

    pub fn set_embed_image_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::ImageUrl(url))
    }

    pub fn set_embed_thumbnail_url(&mut self, embed: usize, url: Option<String>) -> bool {
        self.edit_embed(embed, EmbedEdit::ThumbnailUrl(url))
    }

    pub fn add_embed_field(&mut self, embed: usize, field: EmbedField) -> bool {
        self.apply(Command::AddEmbedField { embed, field })
    }

    pub fn set_embed_field_name(&mut self, embed: usize, field: usize, name: impl Into<String>) -> bool {
        self.apply(Command::EditEmbedField {
            embed,
            field,
            edit: FieldEdit::Name(name.into()),
        })
    }

    pub fn set_embed_field_value(&mut self, embed: usize, field: usize, value: impl Into<String>) -> bool {
        self.apply(Command::EditEmbedField {
            embed,
            field,
            edit: FieldEdit::Value(value.into()),
        })
    }

    pub fn set_embed_field_inline(&mut self, embed: usize, field: usize, inline: Option<bool>) -> bool {
        self.apply(Command::EditEmbedField {
            embed,
            field,
            edit: FieldEdit::Inline(inline),
        })
    }

    pub fn move_embed_field_up(&mut self, embed: usize, field: usize) -> bool {
        self.apply(Command::MoveEmbedFieldUp { embed, field })
    }

    pub fn move_embed_field_down(&mut self, embed: usize, field: usize) -> bool {
        self.apply(Command::MoveEmbedFieldDown { embed, field })
    }

    pub fn delete_embed_field(&mut self, embed: usize, field: usize) -> bool {
        self.apply(Command::DeleteEmbedField { embed, field })
    }

    pub fn duplicate_embed_field(&mut self, embed: usize, field: usize) -> bool {
        self.apply(Command::DuplicateEmbedField { embed, field })
    }

    pub fn clear_embed_fields(&mut self, embed: usize) -> bool {
        self.apply(Command::ClearEmbedFields(embed))
    }

    pub fn add_component(&mut self, component: Component) -> bool {
        self.add_node(NodePath::root(), component.into())
    }

    pub fn move_component_up(&mut self, index: usize) -> bool {
        self.move_node_up(NodePath::at(index))
    }

    pub fn move_component_down(&mut self, index: usize) -> bool {
        self.move_node_down(NodePath::at(index))
    }

    pub fn delete_component(&mut self, index: usize) -> bool {
        self.delete_node(NodePath::at(index))
    }

    pub fn duplicate_component(&mut self, index: usize) -> bool {
        self.duplicate_node(NodePath::at(index))
    }

    pub fn clear_components(&mut self) -> bool {
        self.clear_children(NodePath::root())
    }

    pub fn add_node(&mut self, parent: NodePath, node: Node) -> bool {
        self.apply(Command::AddNode { parent, node })
    }

    pub fn move_node_up(&mut self, path: NodePath) -> bool {
        self.apply(Command::MoveNodeUp(path))
    }

    pub fn move_node_down(&mut self, path: NodePath) -> bool {
        self.apply(Command::MoveNodeDown(path))
    }

    pub fn delete_node(&mut self, path: NodePath) -> bool {
        self.apply(Command::DeleteNode(path))
    }

    pub fn duplicate_node(&mut self, path: NodePath) -> bool {
        self.apply(Command::DuplicateNode(path))
    }

    pub fn clear_children(&mut self, parent: NodePath) -> bool {
        self.apply(Command::ClearChildren(parent))
    }

    pub fn edit_node(&mut self, path: NodePath, edit: NodeEdit) -> bool {
        self.apply(Command::EditNode { path, edit })
    }

    pub fn add_attachment(&mut self, attachment: Attachment) -> bool {
        self.apply(Command::AddAttachment(attachment))
    }

    pub fn remove_attachment(&mut self, index: usize) -> bool {
        self.apply(Command::RemoveAttachment(index))
    }

    pub fn move_attachment_up(&mut self, index: usize) -> bool {
        self.apply(Command::MoveAttachmentUp(index))
    }

    pub fn move_attachment_down(&mut self, index: usize) -> bool {
        self.apply(Command::MoveAttachmentDown(index))
    }

    pub fn clear_attachments(&mut self) -> bool {
        self.apply(Command::ClearAttachments)
    }

    pub fn add_action(&mut self, set: impl Into<String>, action: Action) -> bool {
        self.apply(Command::AddAction {
            set: set.into(),
            action,
        })
    }

    pub fn clear_actions(&mut self, set: impl Into<String>) -> bool {
        self.apply(Command::ClearActions(set.into()))
    }

    pub fn delete_action(&mut self, set: impl Into<String>, action: usize) -> bool {
        self.apply(Command::DeleteAction {
            set: set.into(),
            action,
        })
    }

    pub fn move_action_up(&mut self, set: impl Into<String>, action: usize) -> bool {
        self.apply(Command::MoveActionUp {
            set: set.into(),
            action,
        })
    }

    pub fn move_action_down(&mut self, set: impl Into<String>, action: usize) -> bool {
        self.apply(Command::MoveActionDown {
            set: set.into(),
            action,
        })
    }

    pub fn duplicate_action(&mut self, set: impl Into<String>, action: usize) -> bool {
        self.apply(Command::DuplicateAction {
            set: set.into(),
            action,
        })
    }

    pub fn edit_action(&mut self, set: impl Into<String>, action: usize, edit: ActionEdit) -> bool {
        self.apply(Command::EditAction {
            set: set.into(),
            action,
            edit,
        })
    }

    pub fn set_action_type(&mut self, set: impl Into<String>, action: usize, kind: ActionType) -> bool {
        self.edit_action(set, action, ActionEdit::Type(kind))
    }

    pub fn set_action_text(&mut self, set: impl Into<String>, action: usize, text: impl Into<String>) -> bool {
        self.edit_action(set, action, ActionEdit::Text(text.into()))
    }

    pub fn set_action_target_id(&mut self, set: impl Into<String>, action: usize, target: impl Into<String>) -> bool {
        self.edit_action(set, action, ActionEdit::TargetId(target.into()))
    }

    pub fn set_action_public(&mut self, set: impl Into<String>, action: usize, public: bool) -> bool {
        self.edit_action(set, action, ActionEdit::Public(public))
    }
}
