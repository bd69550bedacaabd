use crate::models::{
    Action, ActionType, Attachment, ButtonStyle, Embed, EmbedField, Emoji, Message,
    SeparatorSpacing,
};

use super::path::{Node, NodePath};

/// Every mutation the store understands.
///
/// Indices that point nowhere and targets of the wrong kind turn a command
/// into a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetContent(String),
    SetUsername(Option<String>),
    SetAvatarUrl(Option<String>),
    SetThreadName(Option<String>),
    SetTts(bool),
    SetComponentsV2(bool),

    AddEmbed(Embed),
    DuplicateEmbed(usize),
    DeleteEmbed(usize),
    MoveEmbedUp(usize),
    MoveEmbedDown(usize),
    ClearEmbeds,
    EditEmbed { embed: usize, edit: EmbedEdit },

    AddEmbedField { embed: usize, field: EmbedField },
    EditEmbedField { embed: usize, field: usize, edit: FieldEdit },
    MoveEmbedFieldUp { embed: usize, field: usize },
    MoveEmbedFieldDown { embed: usize, field: usize },
    DeleteEmbedField { embed: usize, field: usize },
    DuplicateEmbedField { embed: usize, field: usize },
    ClearEmbedFields(usize),

    AddNode { parent: NodePath, node: Node },
    MoveNodeUp(NodePath),
    MoveNodeDown(NodePath),
    DeleteNode(NodePath),
    DuplicateNode(NodePath),
    ClearChildren(NodePath),
    EditNode { path: NodePath, edit: NodeEdit },

    AddAttachment(Attachment),
    RemoveAttachment(usize),
    MoveAttachmentUp(usize),
    MoveAttachmentDown(usize),
    SetAttachmentName { attachment: usize, name: String },
    ClearAttachments,

    AddAction { set: String, action: Action },
    ClearActions(String),
    DeleteAction { set: String, action: usize },
    MoveActionUp { set: String, action: usize },
    MoveActionDown { set: String, action: usize },
    DuplicateAction { set: String, action: usize },
    EditAction { set: String, action: usize, edit: ActionEdit },

    Clear,
    Reset,
    Replace(Box<Message>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmbedEdit {
    Title(Option<String>),
    Description(Option<String>),
    Url(Option<String>),
    Timestamp(Option<String>),
    Color(Option<u32>),
    AuthorName(String),
    AuthorUrl(Option<String>),
    AuthorIconUrl(Option<String>),
    FooterText(Option<String>),
    FooterIconUrl(Option<String>),
    ImageUrl(Option<String>),
    ThumbnailUrl(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Value(String),
    Inline(Option<bool>),
}

/// A partial update of one tree node. Edits a node does not carry are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEdit {
    /// Buttons, select menu options.
    Label(String),
    /// Interactive buttons only; link buttons keep their URL.
    Style(ButtonStyle),
    /// Turns a button into a link button, or updates the link.
    Url(String),
    Disabled(bool),
    Emoji(Option<Emoji>),
    Placeholder(Option<String>),
    MinValues(Option<u8>),
    MaxValues(Option<u8>),
    /// Select menu options, gallery items and thumbnails.
    Description(Option<String>),
    Default(bool),
    /// Text displays.
    Content(String),
    /// Thumbnails, gallery items and files.
    MediaUrl(String),
    Spoiler(bool),
    Divider(bool),
    Spacing(SeparatorSpacing),
    AccentColor(Option<u32>),
    /// Replace a section's accessory with a button or thumbnail.
    Accessory(Box<Node>),
}

/// Setters of one action. Each only applies to the types carrying the field.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEdit {
    Type(ActionType),
    Text(String),
    TargetId(String),
    Public(bool),
    DisableDefaultResponse(bool),
    Permissions(String),
    RoleIds(Vec<String>),
}
