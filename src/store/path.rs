//! Addressing nodes of the component tree.
//!
//! A [`NodePath`] is a list of steps starting at the root component list:
//! `[2]` is the third top-level component, `[2, 0]` its first child, and
//! `[1, Accessory]` the accessory of the section at index 1. The children of
//! an action row are its buttons and select menus, of a select menu its
//! options, of a section its text displays, of a media gallery its items and
//! of a container its sub-components.

use std::fmt;
use std::str::FromStr;

use crate::models::{
    ActionRow, ActionRowItem, Button, Component, Container, ContainerChild, FileComponent,
    MediaGallery, MediaGalleryItem, Section, SectionAccessory, SelectMenu, SelectMenuOption,
    Separator, TextDisplay, Thumbnail, TreeNode, UniqueId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Child(usize),
    Accessory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<Step>);

impl NodePath {
    /// The root component list itself (only meaningful as a parent).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn at(index: usize) -> Self {
        Self(vec![Step::Child(index)])
    }

    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.iter().copied().map(Step::Child).collect())
    }

    #[must_use]
    pub fn child(mut self, index: usize) -> Self {
        self.0.push(Step::Child(index));
        self
    }

    #[must_use]
    pub fn accessory(mut self) -> Self {
        self.0.push(Step::Accessory);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into the parent path and the index inside the parent's children.
    /// `None` for the root and for accessory paths.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        match self.0.split_last() {
            Some((Step::Child(index), parent)) => Some((Self(parent.to_vec()), *index)),
            _ => None,
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "components")?;
        for (depth, step) in self.0.iter().enumerate() {
            match step {
                Step::Child(index) if depth == 0 => write!(f, ".{index}")?,
                Step::Child(index) => write!(f, ".children.{index}")?,
                Step::Accessory => write!(f, ".accessory")?,
            }
        }
        Ok(())
    }
}

/// Parses the short form `1.0.accessory`; `root` or an empty string is the
/// root list. The `components.` / `children.` words of the display form are
/// accepted too.
impl FromStr for NodePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "root" {
            return Ok(Self::root());
        }
        let mut path = Self::root();
        for part in s.split('.') {
            match part {
                "components" | "children" => {}
                "accessory" => path = path.accessory(),
                index => {
                    let index = index
                        .parse()
                        .map_err(|_| format!("invalid path segment {index:?}"))?;
                    path = path.child(index);
                }
            }
        }
        Ok(path)
    }
}

/// An owned node of any kind, as handed to "add" operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    ActionRow(ActionRow),
    Button(Button),
    SelectMenu(SelectMenu),
    SelectMenuOption(SelectMenuOption),
    Section(Section),
    TextDisplay(TextDisplay),
    Thumbnail(Thumbnail),
    MediaGallery(MediaGallery),
    MediaGalleryItem(MediaGalleryItem),
    File(FileComponent),
    Separator(Separator),
    Container(Container),
}

impl Node {
    pub fn into_component(self) -> Option<Component> {
        Some(match self {
            Self::ActionRow(c) => Component::ActionRow(c),
            Self::Section(c) => Component::Section(c),
            Self::TextDisplay(c) => Component::TextDisplay(c),
            Self::MediaGallery(c) => Component::MediaGallery(c),
            Self::File(c) => Component::File(c),
            Self::Separator(c) => Component::Separator(c),
            Self::Container(c) => Component::Container(c),
            _ => return None,
        })
    }

    pub fn into_container_child(self) -> Option<ContainerChild> {
        self.into_component()
            .and_then(|c| ContainerChild::try_from(c).ok())
    }

    pub fn into_action_row_item(self) -> Option<ActionRowItem> {
        match self {
            Self::Button(b) => Some(ActionRowItem::Button(b)),
            Self::SelectMenu(m) => Some(ActionRowItem::SelectMenu(m)),
            _ => None,
        }
    }

    pub fn into_accessory(self) -> Option<SectionAccessory> {
        match self {
            Self::Button(b) => Some(SectionAccessory::Button(b)),
            Self::Thumbnail(t) => Some(SectionAccessory::Thumbnail(t)),
            _ => None,
        }
    }
}

macro_rules! each_node {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::ActionRow($inner) => $body,
            Node::Button($inner) => $body,
            Node::SelectMenu($inner) => $body,
            Node::SelectMenuOption($inner) => $body,
            Node::Section($inner) => $body,
            Node::TextDisplay($inner) => $body,
            Node::Thumbnail($inner) => $body,
            Node::MediaGallery($inner) => $body,
            Node::MediaGalleryItem($inner) => $body,
            Node::File($inner) => $body,
            Node::Separator($inner) => $body,
            Node::Container($inner) => $body,
        }
    };
}

impl TreeNode for Node {
    fn ids(&self, f: &mut dyn FnMut(UniqueId)) {
        each_node!(self, inner => inner.ids(f))
    }

    fn ids_mut(&mut self, f: &mut dyn FnMut(&mut UniqueId)) {
        each_node!(self, inner => inner.ids_mut(f))
    }

    fn action_set_ids(&self, f: &mut dyn FnMut(&str)) {
        each_node!(self, inner => inner.action_set_ids(f))
    }

    fn action_set_ids_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        each_node!(self, inner => inner.action_set_ids_mut(f))
    }
}

impl From<Component> for Node {
    fn from(component: Component) -> Self {
        match component {
            Component::ActionRow(c) => Self::ActionRow(c),
            Component::Section(c) => Self::Section(c),
            Component::TextDisplay(c) => Self::TextDisplay(c),
            Component::MediaGallery(c) => Self::MediaGallery(c),
            Component::File(c) => Self::File(c),
            Component::Separator(c) => Self::Separator(c),
            Component::Container(c) => Self::Container(c),
        }
    }
}

/// Borrowed view of a node found at a path.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    ActionRow(&'a ActionRow),
    Button(&'a Button),
    SelectMenu(&'a SelectMenu),
    SelectMenuOption(&'a SelectMenuOption),
    Section(&'a Section),
    TextDisplay(&'a TextDisplay),
    Thumbnail(&'a Thumbnail),
    MediaGallery(&'a MediaGallery),
    MediaGalleryItem(&'a MediaGalleryItem),
    File(&'a FileComponent),
    Separator(&'a Separator),
    Container(&'a Container),
}

impl<'a> NodeRef<'a> {
    fn of_component(component: &'a Component) -> Self {
        match component {
            Component::ActionRow(c) => Self::ActionRow(c),
            Component::Section(c) => Self::Section(c),
            Component::TextDisplay(c) => Self::TextDisplay(c),
            Component::MediaGallery(c) => Self::MediaGallery(c),
            Component::File(c) => Self::File(c),
            Component::Separator(c) => Self::Separator(c),
            Component::Container(c) => Self::Container(c),
        }
    }

    fn of_child(child: &'a ContainerChild) -> Self {
        match child {
            ContainerChild::ActionRow(c) => Self::ActionRow(c),
            ContainerChild::Section(c) => Self::Section(c),
            ContainerChild::TextDisplay(c) => Self::TextDisplay(c),
            ContainerChild::MediaGallery(c) => Self::MediaGallery(c),
            ContainerChild::File(c) => Self::File(c),
            ContainerChild::Separator(c) => Self::Separator(c),
        }
    }

    fn step(self, step: Step) -> Option<Self> {
        match (self, step) {
            (Self::ActionRow(row), Step::Child(i)) => row.components.get(i).map(|item| match item {
                ActionRowItem::Button(b) => Self::Button(b),
                ActionRowItem::SelectMenu(m) => Self::SelectMenu(m),
            }),
            (Self::SelectMenu(menu), Step::Child(i)) => {
                menu.options.get(i).map(Self::SelectMenuOption)
            }
            (Self::Section(section), Step::Child(i)) => {
                section.components.get(i).map(Self::TextDisplay)
            }
            (Self::Section(section), Step::Accessory) => Some(match &section.accessory {
                SectionAccessory::Button(b) => Self::Button(b),
                SectionAccessory::Thumbnail(t) => Self::Thumbnail(t),
            }),
            (Self::MediaGallery(gallery), Step::Child(i)) => {
                gallery.items.get(i).map(Self::MediaGalleryItem)
            }
            (Self::Container(container), Step::Child(i)) => {
                container.components.get(i).map(Self::of_child)
            }
            _ => None,
        }
    }

    pub fn to_node(self) -> Node {
        match self {
            Self::ActionRow(n) => Node::ActionRow(n.clone()),
            Self::Button(n) => Node::Button(n.clone()),
            Self::SelectMenu(n) => Node::SelectMenu(n.clone()),
            Self::SelectMenuOption(n) => Node::SelectMenuOption(n.clone()),
            Self::Section(n) => Node::Section(n.clone()),
            Self::TextDisplay(n) => Node::TextDisplay(n.clone()),
            Self::Thumbnail(n) => Node::Thumbnail(n.clone()),
            Self::MediaGallery(n) => Node::MediaGallery(n.clone()),
            Self::MediaGalleryItem(n) => Node::MediaGalleryItem(n.clone()),
            Self::File(n) => Node::File(n.clone()),
            Self::Separator(n) => Node::Separator(n.clone()),
            Self::Container(n) => Node::Container(n.clone()),
        }
    }

    pub fn id(self) -> UniqueId {
        match self {
            Self::ActionRow(n) => n.id,
            Self::Button(n) => n.id,
            Self::SelectMenu(n) => n.id,
            Self::SelectMenuOption(n) => n.id,
            Self::Section(n) => n.id,
            Self::TextDisplay(n) => n.id,
            Self::Thumbnail(n) => n.id,
            Self::MediaGallery(n) => n.id,
            Self::MediaGalleryItem(n) => n.id,
            Self::File(n) => n.id,
            Self::Separator(n) => n.id,
            Self::Container(n) => n.id,
        }
    }
}

/// Mutable view of a node found at a path.
pub enum NodeMut<'a> {
    ActionRow(&'a mut ActionRow),
    Button(&'a mut Button),
    SelectMenu(&'a mut SelectMenu),
    SelectMenuOption(&'a mut SelectMenuOption),
    Section(&'a mut Section),
    TextDisplay(&'a mut TextDisplay),
    Thumbnail(&'a mut Thumbnail),
    MediaGallery(&'a mut MediaGallery),
    MediaGalleryItem(&'a mut MediaGalleryItem),
    File(&'a mut FileComponent),
    Separator(&'a mut Separator),
    Container(&'a mut Container),
}

impl<'a> NodeMut<'a> {
    fn of_component(component: &'a mut Component) -> Self {
        match component {
            Component::ActionRow(c) => Self::ActionRow(c),
            Component::Section(c) => Self::Section(c),
            Component::TextDisplay(c) => Self::TextDisplay(c),
            Component::MediaGallery(c) => Self::MediaGallery(c),
            Component::File(c) => Self::File(c),
            Component::Separator(c) => Self::Separator(c),
            Component::Container(c) => Self::Container(c),
        }
    }

    fn of_child(child: &'a mut ContainerChild) -> Self {
        match child {
            ContainerChild::ActionRow(c) => Self::ActionRow(c),
            ContainerChild::Section(c) => Self::Section(c),
            ContainerChild::TextDisplay(c) => Self::TextDisplay(c),
            ContainerChild::MediaGallery(c) => Self::MediaGallery(c),
            ContainerChild::File(c) => Self::File(c),
            ContainerChild::Separator(c) => Self::Separator(c),
        }
    }

    fn step(self, step: Step) -> Option<Self> {
        match (self, step) {
            (Self::ActionRow(row), Step::Child(i)) => {
                row.components.get_mut(i).map(|item| match item {
                    ActionRowItem::Button(b) => Self::Button(b),
                    ActionRowItem::SelectMenu(m) => Self::SelectMenu(m),
                })
            }
            (Self::SelectMenu(menu), Step::Child(i)) => {
                menu.options.get_mut(i).map(Self::SelectMenuOption)
            }
            (Self::Section(section), Step::Child(i)) => {
                section.components.get_mut(i).map(Self::TextDisplay)
            }
            (Self::Section(section), Step::Accessory) => Some(match &mut section.accessory {
                SectionAccessory::Button(b) => Self::Button(b),
                SectionAccessory::Thumbnail(t) => Self::Thumbnail(t),
            }),
            (Self::MediaGallery(gallery), Step::Child(i)) => {
                gallery.items.get_mut(i).map(Self::MediaGalleryItem)
            }
            (Self::Container(container), Step::Child(i)) => {
                container.components.get_mut(i).map(Self::of_child)
            }
            _ => None,
        }
    }

    /// The list of children this node owns, if it owns one.
    fn into_children(self) -> Option<ChildrenMut<'a>> {
        match self {
            Self::ActionRow(row) => Some(ChildrenMut::ActionRow(&mut row.components)),
            Self::SelectMenu(menu) => Some(ChildrenMut::SelectMenu(&mut menu.options)),
            Self::Section(section) => Some(ChildrenMut::Section(&mut section.components)),
            Self::MediaGallery(gallery) => Some(ChildrenMut::MediaGallery(&mut gallery.items)),
            Self::Container(container) => Some(ChildrenMut::Container(&mut container.components)),
            Self::Button(_)
            | Self::SelectMenuOption(_)
            | Self::TextDisplay(_)
            | Self::Thumbnail(_)
            | Self::MediaGalleryItem(_)
            | Self::File(_)
            | Self::Separator(_) => None,
        }
    }
}

/// A child list somewhere in the tree.
pub enum ChildrenMut<'a> {
    Root(&'a mut Vec<Component>),
    ActionRow(&'a mut Vec<ActionRowItem>),
    SelectMenu(&'a mut Vec<SelectMenuOption>),
    Section(&'a mut Vec<TextDisplay>),
    MediaGallery(&'a mut Vec<MediaGalleryItem>),
    Container(&'a mut Vec<ContainerChild>),
}

pub fn resolve<'a>(components: &'a [Component], path: &NodePath) -> Option<NodeRef<'a>> {
    let (first, rest) = path.steps().split_first()?;
    let Step::Child(index) = first else {
        return None;
    };
    let mut node = NodeRef::of_component(components.get(*index)?);
    for step in rest {
        node = node.step(*step)?;
    }
    Some(node)
}

pub fn resolve_mut<'a>(components: &'a mut [Component], path: &NodePath) -> Option<NodeMut<'a>> {
    let (first, rest) = path.steps().split_first()?;
    let Step::Child(index) = first else {
        return None;
    };
    let mut node = NodeMut::of_component(components.get_mut(*index)?);
    for step in rest {
        node = node.step(*step)?;
    }
    Some(node)
}

pub fn children_mut<'a>(
    components: &'a mut Vec<Component>,
    parent: &NodePath,
) -> Option<ChildrenMut<'a>> {
    if parent.is_root() {
        return Some(ChildrenMut::Root(components));
    }
    resolve_mut(components, parent)?.into_children()
}

macro_rules! each_list {
    ($children:expr, $list:ident => $body:expr) => {
        match $children {
            ChildrenMut::Root($list) => $body,
            ChildrenMut::ActionRow($list) => $body,
            ChildrenMut::SelectMenu($list) => $body,
            ChildrenMut::Section($list) => $body,
            ChildrenMut::MediaGallery($list) => $body,
            ChildrenMut::Container($list) => $body,
        }
    };
}

impl ChildrenMut<'_> {
    pub fn len(&self) -> usize {
        each_list!(self, list => list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `node` may sit beside the current entries. Only kinds are
    /// checked here; counts are left to validation.
    pub fn accepts(&self, node: &Node) -> bool {
        match self {
            ChildrenMut::ActionRow(list) => match node {
                Node::Button(_) => !list
                    .iter()
                    .any(|item| matches!(item, ActionRowItem::SelectMenu(_))),
                Node::SelectMenu(_) => list.is_empty(),
                _ => false,
            },
            _ => true,
        }
    }

    /// Append `node` if this list can hold its kind.
    pub fn push(self, node: Node) -> bool {
        match self {
            ChildrenMut::Root(list) => node.into_component().map(|c| list.push(c)).is_some(),
            ChildrenMut::ActionRow(list) => {
                node.into_action_row_item().map(|c| list.push(c)).is_some()
            }
            ChildrenMut::SelectMenu(list) => match node {
                Node::SelectMenuOption(option) => {
                    list.push(option);
                    true
                }
                _ => false,
            },
            ChildrenMut::Section(list) => match node {
                Node::TextDisplay(text) => {
                    list.push(text);
                    true
                }
                _ => false,
            },
            ChildrenMut::MediaGallery(list) => match node {
                Node::MediaGalleryItem(item) => {
                    list.push(item);
                    true
                }
                _ => false,
            },
            ChildrenMut::Container(list) => {
                node.into_container_child().map(|c| list.push(c)).is_some()
            }
        }
    }

    /// Swap the entries at `index` and `index - 1`. No-op at the top.
    pub fn move_up(self, index: usize) -> bool {
        each_list!(self, list => {
            if index == 0 || index >= list.len() {
                return false;
            }
            list.swap(index, index - 1);
            true
        })
    }

    /// Swap the entries at `index` and `index + 1`. No-op at the bottom.
    pub fn move_down(self, index: usize) -> bool {
        each_list!(self, list => {
            if index >= list.len().saturating_sub(1) {
                return false;
            }
            list.swap(index, index + 1);
            true
        })
    }

    pub fn remove(self, index: usize) -> bool {
        each_list!(self, list => {
            if index >= list.len() {
                return false;
            }
            list.remove(index);
            true
        })
    }

    pub fn clear(self) -> bool {
        each_list!(self, list => {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        })
    }

    /// Insert a copy of the entry at `index` right after it. `fresh` rewrites
    /// the copy's identities before insertion.
    pub fn duplicate(self, index: usize, fresh: &mut dyn FnMut(&mut dyn TreeNode)) -> bool {
        each_list!(self, list => {
            let Some(source) = list.get(index) else {
                return false;
            };
            let mut copy = source.clone();
            fresh(&mut copy);
            list.insert(index + 1, copy);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ButtonStyle;

    #[test]
    fn parses_short_and_display_forms() {
        let path = NodePath::at(1).child(0).accessory();
        assert_eq!("1.0.accessory".parse::<NodePath>().unwrap(), path);
        assert_eq!(path.to_string().parse::<NodePath>().unwrap(), path);
        assert_eq!("".parse::<NodePath>().unwrap(), NodePath::root());
        assert!("1.x".parse::<NodePath>().is_err());
    }

    fn tree() -> Vec<Component> {
        vec![
            Component::ActionRow(ActionRow {
                id: UniqueId(1),
                components: vec![ActionRowItem::Button(Button {
                    id: UniqueId(2),
                    ..Button::interactive("A", ButtonStyle::Primary)
                })],
            }),
            Component::Container(Container {
                id: UniqueId(3),
                components: vec![ContainerChild::Section(Section {
                    id: UniqueId(4),
                    components: vec![TextDisplay {
                        id: UniqueId(5),
                        content: "hello".to_string(),
                    }],
                    accessory: SectionAccessory::Thumbnail(Thumbnail {
                        id: UniqueId(6),
                        ..Thumbnail::default()
                    }),
                })],
                ..Container::default()
            }),
        ]
    }

    #[test]
    fn resolves_nested_paths() {
        let components = tree();
        let button = resolve(&components, &NodePath::at(0).child(0));
        assert!(matches!(button, Some(NodeRef::Button(b)) if b.id == UniqueId(2)));

        let text = resolve(&components, &NodePath::from_indices(&[1, 0, 0]));
        assert!(matches!(text, Some(NodeRef::TextDisplay(t)) if t.content == "hello"));

        let accessory = resolve(&components, &NodePath::at(1).child(0).accessory());
        assert!(matches!(accessory, Some(NodeRef::Thumbnail(_))));
    }

    #[test]
    fn stale_paths_resolve_to_none() {
        let components = tree();
        assert!(resolve(&components, &NodePath::at(5)).is_none());
        assert!(resolve(&components, &NodePath::at(0).child(0).child(0)).is_none());
        assert!(resolve(&components, &NodePath::at(0).accessory()).is_none());
        assert!(resolve(&components, &NodePath::root()).is_none());
    }

    #[test]
    fn container_rejects_nested_container() {
        let mut components = tree();
        let children = children_mut(&mut components, &NodePath::at(1)).unwrap();
        assert!(!children.push(Node::Container(Container::default())));
    }

    #[test]
    fn row_with_select_menu_takes_nothing_else() {
        let mut components = vec![Component::ActionRow(ActionRow {
            id: UniqueId(1),
            components: vec![ActionRowItem::SelectMenu(SelectMenu::default())],
        })];
        let children = children_mut(&mut components, &NodePath::at(0)).unwrap();
        assert!(!children.accepts(&Node::Button(Button::link("Docs", "https://a.b"))));
        assert!(!children.accepts(&Node::SelectMenu(SelectMenu::default())));
    }

    #[test]
    fn button_row_accepts_more_buttons_than_discord_allows() {
        let button = ActionRowItem::Button(Button::link("Docs", "https://a.b"));
        let mut components = vec![Component::ActionRow(ActionRow {
            id: UniqueId(1),
            components: vec![button; 5],
        })];
        let children = children_mut(&mut components, &NodePath::at(0)).unwrap();
        assert!(children.accepts(&Node::Button(Button::link("More", "https://a.b"))));
        assert!(!children.accepts(&Node::SelectMenu(SelectMenu::default())));
    }

    #[test]
    fn moves_at_the_edges_are_no_ops() {
        let mut components = tree();
        let children = children_mut(&mut components, &NodePath::root()).unwrap();
        assert!(!children.move_down(usize::MAX));
        let children = children_mut(&mut components, &NodePath::root()).unwrap();
        assert!(!children.move_down(1));
        let children = children_mut(&mut components, &NodePath::root()).unwrap();
        assert!(!children.move_up(usize::MAX));
        assert_eq!(components, tree());
    }

    #[test]
    fn display_names_field_path() {
        let path = NodePath::at(1).child(0).accessory();
        assert_eq!(path.to_string(), "components.1.children.0.accessory");
    }
}
