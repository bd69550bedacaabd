//! The single clean-up pass that runs after every mutation.
//!
//! * optional strings that became empty are dropped,
//! * author, footer, image and thumbnail objects without any content collapse
//!   to absent,
//! * nodes without an id get one, interactive nodes without an action set id
//!   get one,
//! * every referenced action set exists and unreferenced sets are removed.

use std::collections::BTreeSet;

use crate::models::{
    ActionRowItem, Component, ContainerChild, Embed, Emoji, IdGenerator, Message,
    SectionAccessory, SelectMenu, TreeNode,
};

pub fn normalize(message: &mut Message, ids: &mut IdGenerator) {
    drop_empty(&mut message.username);
    drop_empty(&mut message.avatar_url);
    drop_empty(&mut message.thread_name);

    for embed in &mut message.embeds {
        normalize_embed(embed);
    }
    for component in &mut message.components {
        normalize_component(component);
    }
    for attachment in &mut message.attachments {
        drop_empty(&mut attachment.description);
    }

    message.assign_missing_ids(ids);
    for component in &mut message.components {
        component.action_set_ids_mut(&mut |set_id| {
            if set_id.is_empty() {
                *set_id = ids.next_action_set_id();
            }
        });
    }

    reconcile_actions(message);
}

fn normalize_embed(embed: &mut Embed) {
    drop_empty(&mut embed.title);
    drop_empty(&mut embed.description);
    drop_empty(&mut embed.url);
    drop_empty(&mut embed.timestamp);

    if let Some(author) = &mut embed.author {
        drop_empty(&mut author.url);
        drop_empty(&mut author.icon_url);
        if author.is_empty() {
            embed.author = None;
        }
    }
    if let Some(footer) = &mut embed.footer {
        drop_empty(&mut footer.text);
        drop_empty(&mut footer.icon_url);
        if footer.is_empty() {
            embed.footer = None;
        }
    }
    if embed.image.as_ref().is_some_and(|m| m.url.is_empty()) {
        embed.image = None;
    }
    if embed.thumbnail.as_ref().is_some_and(|m| m.url.is_empty()) {
        embed.thumbnail = None;
    }
}

fn normalize_component(component: &mut Component) {
    match component {
        Component::Container(container) => {
            for child in &mut container.components {
                normalize_child(child);
            }
        }
        Component::ActionRow(row) => normalize_row(&mut row.components),
        Component::Section(section) => normalize_accessory(&mut section.accessory),
        Component::MediaGallery(gallery) => {
            for item in &mut gallery.items {
                drop_empty(&mut item.description);
            }
        }
        Component::TextDisplay(_) | Component::File(_) | Component::Separator(_) => {}
    }
}

fn normalize_child(child: &mut ContainerChild) {
    match child {
        ContainerChild::ActionRow(row) => normalize_row(&mut row.components),
        ContainerChild::Section(section) => normalize_accessory(&mut section.accessory),
        ContainerChild::MediaGallery(gallery) => {
            for item in &mut gallery.items {
                drop_empty(&mut item.description);
            }
        }
        ContainerChild::TextDisplay(_) | ContainerChild::File(_) | ContainerChild::Separator(_) => {
        }
    }
}

fn normalize_row(items: &mut [ActionRowItem]) {
    for item in items {
        match item {
            ActionRowItem::Button(button) => drop_empty_emoji(&mut button.emoji),
            ActionRowItem::SelectMenu(menu) => normalize_select(menu),
        }
    }
}

fn normalize_select(menu: &mut SelectMenu) {
    drop_empty(&mut menu.placeholder);
    for option in &mut menu.options {
        drop_empty(&mut option.description);
        drop_empty_emoji(&mut option.emoji);
    }
}

fn normalize_accessory(accessory: &mut SectionAccessory) {
    match accessory {
        SectionAccessory::Button(button) => drop_empty_emoji(&mut button.emoji),
        SectionAccessory::Thumbnail(thumbnail) => drop_empty(&mut thumbnail.description),
    }
}

/// Create missing action sets and drop the ones nothing points at any more.
fn reconcile_actions(message: &mut Message) {
    let referenced: BTreeSet<String> = message.referenced_action_sets().into_iter().collect();

    message.actions.retain(|id, _| referenced.contains(id));
    for id in referenced {
        message.actions.entry(id).or_default();
    }
}

fn drop_empty(value: &mut Option<String>) {
    if value.as_deref().is_some_and(str::is_empty) {
        *value = None;
    }
}

fn drop_empty_emoji(emoji: &mut Option<Emoji>) {
    if emoji.as_ref().is_some_and(|e| e.name.is_empty() && e.id.is_none()) {
        *emoji = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionRow, Button, ButtonStyle, EmbedAuthor, EmbedFooter, EmbedMedia};

    #[test]
    fn collapses_empty_nested_objects() {
        let mut message = Message::default();
        message.embeds.push(Embed {
            author: Some(EmbedAuthor::default()),
            footer: Some(EmbedFooter {
                text: Some(String::new()),
                icon_url: None,
            }),
            image: Some(EmbedMedia::default()),
            title: Some(String::new()),
            ..Embed::default()
        });

        normalize(&mut message, &mut IdGenerator::default());

        let embed = &message.embeds[0];
        assert!(embed.author.is_none());
        assert!(embed.footer.is_none());
        assert!(embed.image.is_none());
        assert!(embed.title.is_none());
    }

    #[test]
    fn keeps_author_with_only_url() {
        let mut message = Message::default();
        message.embeds.push(Embed {
            author: Some(EmbedAuthor {
                name: String::new(),
                url: Some("https://example.com".to_string()),
                icon_url: None,
            }),
            ..Embed::default()
        });

        normalize(&mut message, &mut IdGenerator::default());
        assert!(message.embeds[0].author.is_some());
    }

    #[test]
    fn creates_and_prunes_action_sets() {
        let mut message = Message::default();
        message.components.push(Component::ActionRow(ActionRow {
            components: vec![ActionRowItem::Button(Button::interactive(
                "Go",
                ButtonStyle::Primary,
            ))],
            ..ActionRow::default()
        }));
        message
            .actions
            .insert("orphan".to_string(), Default::default());

        normalize(&mut message, &mut IdGenerator::default());

        let referenced = message.referenced_action_sets();
        assert_eq!(referenced.len(), 1);
        assert!(!referenced[0].is_empty());
        assert!(message.actions.contains_key(&referenced[0]));
        assert!(!message.actions.contains_key("orphan"));
    }
}
