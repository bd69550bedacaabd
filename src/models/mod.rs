//! Data models for the message document: the message itself, embeds, the
//! component tree, action sets and attachments.

mod action;
mod component;
mod embed;

use std::collections::BTreeMap;
use std::fmt;

pub use action::{Action, ActionSet, ActionType};
pub use component::{
    ActionRow, ActionRowItem, Button, ButtonKind, ButtonStyle, Component, Container,
    ContainerChild, Emoji, FileComponent, MediaGallery, MediaGalleryItem, MediaItem, Section,
    LINK_BUTTON_STYLE, SectionAccessory, SelectMenu, SelectMenuOption, Separator,
    SeparatorSpacing, TextDisplay, Thumbnail, TreeNode, tags,
};
pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia};

/// Message flag that switches the document to the Components V2 layout.
pub const FLAG_COMPONENTS_V2: u64 = 1 << 15;

/// Discord's structural limits, checked by validation. The store never refuses
/// an edit for exceeding them.
pub mod limits {
    pub const MAX_EMBEDS: usize = 10;
    pub const MAX_EMBED_FIELDS: usize = 25;
    pub const MAX_LEGACY_ROWS: usize = 5;
    pub const MAX_ROW_BUTTONS: usize = 5;
    pub const MAX_SELECT_OPTIONS: usize = 25;
    pub const MAX_ROOT_COMPONENTS: usize = 10;
    pub const MAX_CONTAINER_CHILDREN: usize = 10;
    pub const MAX_SECTION_TEXTS: usize = 3;
    pub const MAX_GALLERY_ITEMS: usize = 10;
    pub const MAX_ACTIONS: usize = 5;
}

/// Locally generated identifier used as a stable key for embeds, fields and
/// component nodes. Never sent to Discord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueId(pub u64);

impl UniqueId {
    /// Placeholder for nodes that have not been assigned an id yet.
    pub const UNSET: Self = Self(0);

    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out ids that are strictly greater than every id already present in
/// the documents it has observed.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn for_message(message: &Message) -> Self {
        let mut generator = Self::default();
        generator.observe(message);
        generator
    }

    pub fn next_id(&mut self) -> UniqueId {
        let id = UniqueId(self.next);
        self.next += 1;
        id
    }

    /// Fresh identifier for an action set, in the same number space as node ids.
    pub fn next_action_set_id(&mut self) -> String {
        self.next_id().to_string()
    }

    /// Bump the counter past every node id and numeric action set key of `message`.
    pub fn observe(&mut self, message: &Message) {
        let mut highest = self.next.saturating_sub(1);
        message.ids(&mut |id| highest = highest.max(id.0));
        for key in message.actions.keys() {
            if let Ok(value) = key.parse::<u64>() {
                highest = highest.max(value);
            }
        }
        self.next = highest.saturating_add(1);
    }
}

/// A file uploaded alongside the message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment {
    pub id: UniqueId,
    pub name: String,
    pub size: u64,
    pub description: Option<String>,
}

/// The root aggregate: one Discord message as edited in the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub content: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub thread_name: Option<String>,
    pub tts: bool,
    pub flags: u64,
    pub embeds: Vec<Embed>,
    pub components: Vec<Component>,
    pub actions: BTreeMap<String, ActionSet>,
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn components_v2_enabled(&self) -> bool {
        self.flags & FLAG_COMPONENTS_V2 != 0
    }

    /// Visit every locally generated id in the document.
    pub fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        self.embeds.iter().for_each(|e| e.ids(f));
        self.components.iter().for_each(|c| c.ids(f));
        for set in self.actions.values() {
            set.actions.iter().for_each(|a| a.ids(f));
        }
        self.attachments.iter().for_each(|a| a.ids(f));
    }

    /// Visit every locally generated id mutably.
    pub fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        self.embeds.iter_mut().for_each(|e| e.ids_mut(f));
        self.components.iter_mut().for_each(|c| c.ids_mut(f));
        for set in self.actions.values_mut() {
            set.actions.iter_mut().for_each(|a| a.ids_mut(f));
        }
        self.attachments.iter_mut().for_each(|a| a.ids_mut(f));
    }

    /// Give every node that still carries [`UniqueId::UNSET`] a fresh id.
    pub fn assign_missing_ids(&mut self, ids: &mut IdGenerator) {
        self.ids_mut(&mut |id| {
            if id.is_unset() {
                *id = ids.next_id();
            }
        });
    }

    /// Copy of the document with every local id reset, for comparisons that
    /// must ignore them.
    pub fn without_ids(&self) -> Self {
        let mut copy = self.clone();
        copy.ids_mut(&mut |id| *id = UniqueId::UNSET);
        copy
    }

    /// Every action set id referenced by a button or select menu option.
    pub fn referenced_action_sets(&self) -> Vec<String> {
        let mut out = Vec::new();
        for component in &self.components {
            component.action_set_ids(&mut |id| out.push(id.to_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_skips_existing_ids() {
        let mut message = Message::default();
        message.embeds.push(Embed {
            id: UniqueId(41),
            ..Embed::default()
        });
        message
            .actions
            .insert("99".to_string(), ActionSet::default());

        let mut ids = IdGenerator::for_message(&message);
        assert_eq!(ids.next_id(), UniqueId(100));
    }

    #[test]
    fn assign_missing_ids_only_touches_unset() {
        let mut message = Message::default();
        message.embeds.push(Embed {
            id: UniqueId(7),
            fields: vec![EmbedField::default()],
            ..Embed::default()
        });

        let mut ids = IdGenerator::for_message(&message);
        message.assign_missing_ids(&mut ids);

        assert_eq!(message.embeds[0].id, UniqueId(7));
        assert_eq!(message.embeds[0].fields[0].id, UniqueId(8));
    }

    #[test]
    fn read_only_visits_match_mutable_ones() {
        let mut option = SelectMenuOption::new("pick");
        option.action_set_id = "12".to_string();
        let mut button = Button::interactive("Go", ButtonStyle::Primary);
        button.kind = ButtonKind::Interactive {
            style: ButtonStyle::Primary,
            action_set_id: "11".to_string(),
        };
        let mut message = Message {
            embeds: vec![Embed::titled("a")],
            components: vec![Component::Container(Container {
                components: vec![
                    ContainerChild::Section(Section {
                        id: UniqueId::UNSET,
                        components: vec![TextDisplay::new("hi")],
                        accessory: SectionAccessory::Button(button),
                    }),
                    ContainerChild::ActionRow(ActionRow {
                        id: UniqueId::UNSET,
                        components: vec![ActionRowItem::SelectMenu(SelectMenu {
                            options: vec![option],
                            ..SelectMenu::default()
                        })],
                    }),
                ],
                ..Container::default()
            })],
            ..Message::default()
        };
        message.assign_missing_ids(&mut IdGenerator::default());

        let mut seen = Vec::new();
        message.ids(&mut |id| seen.push(id));
        let mut expected = Vec::new();
        message.clone().ids_mut(&mut |id| expected.push(*id));
        assert_eq!(seen, expected);
        assert_eq!(seen.len(), 8);

        assert_eq!(message.referenced_action_sets(), ["11", "12"]);
    }
}
