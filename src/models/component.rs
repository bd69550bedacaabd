//! The component tree.
//!
//! Legacy messages only use action rows holding buttons or one select menu.
//! Components V2 adds sections, text displays, media galleries, files,
//! separators and containers. Each kind is its own variant so every consumer
//! matches exhaustively instead of comparing numeric `type` tags.

use super::UniqueId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emoji {
    pub id: Option<String>,
    pub name: String,
    pub animated: bool,
}

/// Style of a button that triggers actions. Link buttons have no style choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
}

impl ButtonStyle {
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Success => 3,
            Self::Danger => 4,
        }
    }

    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Primary),
            2 => Some(Self::Secondary),
            3 => Some(Self::Success),
            4 => Some(Self::Danger),
            _ => None,
        }
    }
}

/// Wire value of the link button style.
pub const LINK_BUTTON_STYLE: u8 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonKind {
    Interactive {
        style: ButtonStyle,
        action_set_id: String,
    },
    Link {
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: UniqueId,
    pub label: String,
    pub emoji: Option<Emoji>,
    pub disabled: bool,
    pub kind: ButtonKind,
}

impl Button {
    pub fn interactive(label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            id: UniqueId::UNSET,
            label: label.into(),
            emoji: None,
            disabled: false,
            kind: ButtonKind::Interactive {
                style,
                action_set_id: String::new(),
            },
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: UniqueId::UNSET,
            label: label.into(),
            emoji: None,
            disabled: false,
            kind: ButtonKind::Link { url: url.into() },
        }
    }

    pub fn action_set_id(&self) -> Option<&str> {
        match &self.kind {
            ButtonKind::Interactive { action_set_id, .. } => Some(action_set_id),
            ButtonKind::Link { .. } => None,
        }
    }

    pub fn wire_style(&self) -> u8 {
        match &self.kind {
            ButtonKind::Interactive { style, .. } => style.wire_value(),
            ButtonKind::Link { .. } => LINK_BUTTON_STYLE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectMenuOption {
    pub id: UniqueId,
    pub label: String,
    pub description: Option<String>,
    pub emoji: Option<Emoji>,
    pub default: bool,
    pub action_set_id: String,
}

impl SelectMenuOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectMenu {
    pub id: UniqueId,
    pub placeholder: Option<String>,
    pub min_values: Option<u8>,
    pub max_values: Option<u8>,
    pub disabled: bool,
    pub options: Vec<SelectMenuOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionRowItem {
    Button(Button),
    SelectMenu(SelectMenu),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRow {
    pub id: UniqueId,
    pub components: Vec<ActionRowItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDisplay {
    pub id: UniqueId,
    pub content: String,
}

impl TextDisplay {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: UniqueId::UNSET,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaItem {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thumbnail {
    pub id: UniqueId,
    pub media: MediaItem,
    pub description: Option<String>,
    pub spoiler: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionAccessory {
    Button(Button),
    Thumbnail(Thumbnail),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: UniqueId,
    pub components: Vec<TextDisplay>,
    pub accessory: SectionAccessory,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaGalleryItem {
    pub id: UniqueId,
    pub media: MediaItem,
    pub description: Option<String>,
    pub spoiler: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaGallery {
    pub id: UniqueId,
    pub items: Vec<MediaGalleryItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileComponent {
    pub id: UniqueId,
    pub file: MediaItem,
    pub spoiler: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeparatorSpacing {
    #[default]
    Small,
    Large,
}

impl SeparatorSpacing {
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Large => 2,
        }
    }

    pub fn from_wire(value: u8) -> Self {
        if value == 2 { Self::Large } else { Self::Small }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Separator {
    pub id: UniqueId,
    pub divider: bool,
    pub spacing: SeparatorSpacing,
}

/// Anything a container may hold: every root kind except another container.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerChild {
    ActionRow(ActionRow),
    Section(Section),
    TextDisplay(TextDisplay),
    MediaGallery(MediaGallery),
    File(FileComponent),
    Separator(Separator),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: UniqueId,
    pub accent_color: Option<u32>,
    pub spoiler: bool,
    pub components: Vec<ContainerChild>,
}

/// A top-level layout node.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    ActionRow(ActionRow),
    Section(Section),
    TextDisplay(TextDisplay),
    MediaGallery(MediaGallery),
    File(FileComponent),
    Separator(Separator),
    Container(Container),
}

/// Numeric `type` tags used on the wire.
pub mod tags {
    pub const ACTION_ROW: u8 = 1;
    pub const BUTTON: u8 = 2;
    pub const SELECT_MENU: u8 = 3;
    pub const SECTION: u8 = 9;
    pub const TEXT_DISPLAY: u8 = 10;
    pub const THUMBNAIL: u8 = 11;
    pub const MEDIA_GALLERY: u8 = 12;
    pub const FILE: u8 = 13;
    pub const SEPARATOR: u8 = 14;
    pub const CONTAINER: u8 = 17;
}

impl Component {
    pub fn tag(&self) -> u8 {
        match self {
            Self::ActionRow(_) => tags::ACTION_ROW,
            Self::Section(_) => tags::SECTION,
            Self::TextDisplay(_) => tags::TEXT_DISPLAY,
            Self::MediaGallery(_) => tags::MEDIA_GALLERY,
            Self::File(_) => tags::FILE,
            Self::Separator(_) => tags::SEPARATOR,
            Self::Container(_) => tags::CONTAINER,
        }
    }

    /// Only bare action rows are part of the legacy layout.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::ActionRow(_))
    }
}

impl From<ContainerChild> for Component {
    fn from(child: ContainerChild) -> Self {
        match child {
            ContainerChild::ActionRow(c) => Self::ActionRow(c),
            ContainerChild::Section(c) => Self::Section(c),
            ContainerChild::TextDisplay(c) => Self::TextDisplay(c),
            ContainerChild::MediaGallery(c) => Self::MediaGallery(c),
            ContainerChild::File(c) => Self::File(c),
            ContainerChild::Separator(c) => Self::Separator(c),
        }
    }
}

impl TryFrom<Component> for ContainerChild {
    type Error = Container;

    /// Containers cannot nest; the rejected container is handed back.
    fn try_from(component: Component) -> Result<Self, Self::Error> {
        Ok(match component {
            Component::ActionRow(c) => Self::ActionRow(c),
            Component::Section(c) => Self::Section(c),
            Component::TextDisplay(c) => Self::TextDisplay(c),
            Component::MediaGallery(c) => Self::MediaGallery(c),
            Component::File(c) => Self::File(c),
            Component::Separator(c) => Self::Separator(c),
            Component::Container(c) => return Err(c),
        })
    }
}

/// Traversal over the locally generated ids and the action set references of
/// a node and everything below it.
pub trait TreeNode {
    fn ids(&self, f: &mut dyn FnMut(UniqueId));

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId));

    fn action_set_ids(&self, _f: &mut dyn FnMut(&str)) {}

    fn action_set_ids_mut(&mut self, _f: &mut dyn FnMut(&mut String)) {}
}

macro_rules! leaf_node {
    ($($ty:ty),* $(,)?) => {
        $(impl TreeNode for $ty {
            fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
                f(self.id);
            }

            fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
                f(&mut self.id);
            }
        })*
    };
}

leaf_node!(
    TextDisplay,
    Thumbnail,
    MediaGalleryItem,
    FileComponent,
    Separator,
    super::EmbedField,
    super::Attachment,
    super::Action,
);

impl TreeNode for Button {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        if let Some(id) = self.action_set_id() {
            f(id);
        }
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        if let ButtonKind::Interactive { action_set_id, .. } = &mut self.kind {
            f(action_set_id);
        }
    }
}

impl TreeNode for SelectMenuOption {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.action_set_id);
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        f(&mut self.action_set_id);
    }
}

impl TreeNode for SelectMenu {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.options.iter().for_each(|o| o.ids(f));
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.options.iter_mut().for_each(|o| o.ids_mut(f));
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        self.options.iter().for_each(|o| o.action_set_ids(f));
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        self.options.iter_mut().for_each(|o| o.action_set_ids_mut(f));
    }
}

impl TreeNode for ActionRowItem {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        match self {
            Self::Button(b) => b.ids(f),
            Self::SelectMenu(m) => m.ids(f),
        }
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        match self {
            Self::Button(b) => b.ids_mut(f),
            Self::SelectMenu(m) => m.ids_mut(f),
        }
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Self::Button(b) => b.action_set_ids(f),
            Self::SelectMenu(m) => m.action_set_ids(f),
        }
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        match self {
            Self::Button(b) => b.action_set_ids_mut(f),
            Self::SelectMenu(m) => m.action_set_ids_mut(f),
        }
    }
}

impl TreeNode for ActionRow {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.components.iter().for_each(|c| c.ids(f));
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.components.iter_mut().for_each(|c| c.ids_mut(f));
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        self.components.iter().for_each(|c| c.action_set_ids(f));
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        self.components
            .iter_mut()
            .for_each(|c| c.action_set_ids_mut(f));
    }
}

impl TreeNode for SectionAccessory {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        match self {
            Self::Button(b) => b.ids(f),
            Self::Thumbnail(t) => t.ids(f),
        }
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        match self {
            Self::Button(b) => b.ids_mut(f),
            Self::Thumbnail(t) => t.ids_mut(f),
        }
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        if let Self::Button(b) = self {
            b.action_set_ids(f);
        }
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        if let Self::Button(b) = self {
            b.action_set_ids_mut(f);
        }
    }
}

impl TreeNode for Section {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.components.iter().for_each(|c| c.ids(f));
        self.accessory.ids(f);
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.components.iter_mut().for_each(|c| c.ids_mut(f));
        self.accessory.ids_mut(f);
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        self.accessory.action_set_ids(f);
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        self.accessory.action_set_ids_mut(f);
    }
}

impl TreeNode for MediaGallery {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.items.iter().for_each(|i| i.ids(f));
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.items.iter_mut().for_each(|i| i.ids_mut(f));
    }
}

/// Forwards every traversal to the wrapped node of a layout enum.
macro_rules! layout_node {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl TreeNode for $ty {
            fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
                match self {
                    $(Self::$variant(c) => c.ids(f),)*
                }
            }

            fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
                match self {
                    $(Self::$variant(c) => c.ids_mut(f),)*
                }
            }

            fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
                match self {
                    $(Self::$variant(c) => c.action_set_ids(f),)*
                }
            }

            fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
                match self {
                    $(Self::$variant(c) => c.action_set_ids_mut(f),)*
                }
            }
        }
    };
}

layout_node!(ContainerChild {
    ActionRow,
    Section,
    TextDisplay,
    MediaGallery,
    File,
    Separator,
});

layout_node!(Component {
    ActionRow,
    Section,
    TextDisplay,
    MediaGallery,
    File,
    Separator,
    Container,
});

impl TreeNode for Container {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.components.iter().for_each(|c| c.ids(f));
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.components.iter_mut().for_each(|c| c.ids_mut(f));
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        self.components.iter().for_each(|c| c.action_set_ids(f));
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        self.components
            .iter_mut()
            .for_each(|c| c.action_set_ids_mut(f));
    }
}

impl TreeNode for super::Embed {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        f(self.id);
        self.fields.iter().for_each(|field| field.ids(f));
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        f(&mut self.id);
        self.fields.iter_mut().for_each(|field| field.ids_mut(f));
    }
}
