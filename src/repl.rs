//! Line commands understood by `embed-generator edit`.

use embed_generator::models::{
    Action, ActionRow, Attachment, Button, ButtonStyle, Container, Embed, EmbedField, FileComponent,
    MediaGallery, MediaGalleryItem, MediaItem, Section, SectionAccessory, SelectMenu,
    SelectMenuOption, Separator, TextDisplay, Thumbnail, UniqueId,
};
use embed_generator::store::{Command, EmbedEdit, FieldEdit, Node, NodeEdit, NodePath};

pub const HELP: &str = "\
content <text>                      set the message content
username|avatar|thread [value]      set or clear a webhook override
tts on|off, v2 on|off               toggle text-to-speech or Components V2
embed add [title]                   append an embed
embed dup|del|up|down <i>           rearrange embeds
embed clear                         remove all embeds
embed title|desc|url|timestamp|author|footer|image|thumbnail <i> [text]
embed color <i> [#rrggbb]
field add <i> <name> = <value>      append a field to embed i
field dup|del|up|down <i> <j>
field name|value <i> <j> <text>
node add <parent> <kind> [args]     kinds: row container text section separator gallery
                                    item file button link select option thumbnail
node dup|del|up|down|clear <path>   paths look like 0, 1.2 or 3.accessory
node label|content|url|media|placeholder <path> <text>
action add <set> <text>             add a text response to an action set
action del|up|down|dup <set> <k>
attach add <name> <size>, attach del <i>
clear, reset                        blank document or welcome message
undo [n], redo [n]
show [webhook], issues, save, backup <name>, restore <name>, backups
help, quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplAction {
    Apply(Command),
    Undo(usize),
    Redo(usize),
    Show { webhook: bool },
    Issues,
    Save,
    Backup(String),
    Restore(String),
    Backups,
    Help,
    Quit,
}

/// First whitespace-separated word and the trimmed remainder.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim()),
        None => (s, ""),
    }
}

fn index(word: &str) -> Result<usize, String> {
    word.parse()
        .map_err(|_| format!("expected an index, got {word:?}"))
}

fn optional(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn switch(word: &str) -> Result<bool, String> {
    match word {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got {other:?}")),
    }
}

fn color(text: &str) -> Result<Option<u32>, String> {
    if text.is_empty() {
        return Ok(None);
    }
    let hex = text.trim_start_matches('#');
    u32::from_str_radix(hex, 16)
        .map(Some)
        .map_err(|_| format!("invalid color {text:?}"))
}

pub fn parse_line(line: &str) -> Result<ReplAction, String> {
    let (word, rest) = split_word(line);
    let apply = |command: Command| -> Result<ReplAction, String> { Ok(ReplAction::Apply(command)) };
    match word {
        "content" => apply(Command::SetContent(rest.to_string())),
        "username" => apply(Command::SetUsername(optional(rest))),
        "avatar" => apply(Command::SetAvatarUrl(optional(rest))),
        "thread" => apply(Command::SetThreadName(optional(rest))),
        "tts" => apply(Command::SetTts(switch(rest)?)),
        "v2" => apply(Command::SetComponentsV2(switch(rest)?)),
        "embed" => embed(rest).map(ReplAction::Apply),
        "field" => field(rest).map(ReplAction::Apply),
        "node" => node(rest).map(ReplAction::Apply),
        "action" => action(rest).map(ReplAction::Apply),
        "attach" => attachment(rest).map(ReplAction::Apply),
        "clear" => apply(Command::Clear),
        "reset" => apply(Command::Reset),
        "undo" => Ok(ReplAction::Undo(steps(rest)?)),
        "redo" => Ok(ReplAction::Redo(steps(rest)?)),
        "show" => Ok(ReplAction::Show {
            webhook: rest == "webhook",
        }),
        "issues" => Ok(ReplAction::Issues),
        "save" => Ok(ReplAction::Save),
        "backup" if !rest.is_empty() => Ok(ReplAction::Backup(rest.to_string())),
        "restore" if !rest.is_empty() => Ok(ReplAction::Restore(rest.to_string())),
        "backups" => Ok(ReplAction::Backups),
        "help" | "?" => Ok(ReplAction::Help),
        "quit" | "exit" => Ok(ReplAction::Quit),
        other => Err(format!("unknown command {other:?}, try help")),
    }
}

fn steps(rest: &str) -> Result<usize, String> {
    if rest.is_empty() { Ok(1) } else { index(rest) }
}

fn embed(rest: &str) -> Result<Command, String> {
    let (op, rest) = split_word(rest);
    if op == "add" {
        return Ok(Command::AddEmbed(optional(rest).map_or_else(Embed::default, Embed::titled)));
    }
    if op == "clear" {
        return Ok(Command::ClearEmbeds);
    }

    let (i, text) = split_word(rest);
    let i = index(i)?;
    let edit = match op {
        "dup" => return Ok(Command::DuplicateEmbed(i)),
        "del" => return Ok(Command::DeleteEmbed(i)),
        "up" => return Ok(Command::MoveEmbedUp(i)),
        "down" => return Ok(Command::MoveEmbedDown(i)),
        "title" => EmbedEdit::Title(optional(text)),
        "desc" => EmbedEdit::Description(optional(text)),
        "url" => EmbedEdit::Url(optional(text)),
        "timestamp" => EmbedEdit::Timestamp(optional(text)),
        "color" => EmbedEdit::Color(color(text)?),
        "author" => EmbedEdit::AuthorName(text.to_string()),
        "footer" => EmbedEdit::FooterText(optional(text)),
        "image" => EmbedEdit::ImageUrl(optional(text)),
        "thumbnail" => EmbedEdit::ThumbnailUrl(optional(text)),
        other => return Err(format!("unknown embed operation {other:?}")),
    };
    Ok(Command::EditEmbed { embed: i, edit })
}

fn field(rest: &str) -> Result<Command, String> {
    let (op, rest) = split_word(rest);
    let (embed, rest) = split_word(rest);
    let embed = index(embed)?;

    if op == "add" {
        let (name, value) = rest
            .split_once('=')
            .ok_or("expected <name> = <value>")?;
        return Ok(Command::AddEmbedField {
            embed,
            field: EmbedField::new(name.trim(), value.trim()),
        });
    }

    let (field, text) = split_word(rest);
    let field = index(field)?;
    Ok(match op {
        "dup" => Command::DuplicateEmbedField { embed, field },
        "del" => Command::DeleteEmbedField { embed, field },
        "up" => Command::MoveEmbedFieldUp { embed, field },
        "down" => Command::MoveEmbedFieldDown { embed, field },
        "name" => Command::EditEmbedField {
            embed,
            field,
            edit: FieldEdit::Name(text.to_string()),
        },
        "value" => Command::EditEmbedField {
            embed,
            field,
            edit: FieldEdit::Value(text.to_string()),
        },
        other => return Err(format!("unknown field operation {other:?}")),
    })
}

fn node(rest: &str) -> Result<Command, String> {
    let (op, rest) = split_word(rest);
    let (path, text) = split_word(rest);
    let path: NodePath = path.parse()?;

    Ok(match op {
        "add" => Command::AddNode {
            parent: path,
            node: new_node(text)?,
        },
        "dup" => Command::DuplicateNode(path),
        "del" => Command::DeleteNode(path),
        "up" => Command::MoveNodeUp(path),
        "down" => Command::MoveNodeDown(path),
        "clear" => Command::ClearChildren(path),
        "label" => Command::EditNode {
            path,
            edit: NodeEdit::Label(text.to_string()),
        },
        "content" => Command::EditNode {
            path,
            edit: NodeEdit::Content(text.to_string()),
        },
        "url" => Command::EditNode {
            path,
            edit: NodeEdit::Url(text.to_string()),
        },
        "media" => Command::EditNode {
            path,
            edit: NodeEdit::MediaUrl(text.to_string()),
        },
        "placeholder" => Command::EditNode {
            path,
            edit: NodeEdit::Placeholder(optional(text)),
        },
        other => return Err(format!("unknown node operation {other:?}")),
    })
}

fn media(url: &str) -> MediaItem {
    MediaItem {
        url: url.to_string(),
    }
}

fn new_node(args: &str) -> Result<Node, String> {
    let (kind, args) = split_word(args);
    Ok(match kind {
        "row" => Node::ActionRow(ActionRow::default()),
        "container" => Node::Container(Container::default()),
        "text" => Node::TextDisplay(TextDisplay::new(args)),
        "section" => Node::Section(Section {
            id: UniqueId::UNSET,
            components: vec![TextDisplay::new(args)],
            accessory: SectionAccessory::Button(Button::interactive("Button", ButtonStyle::Primary)),
        }),
        "separator" => Node::Separator(Separator {
            divider: true,
            ..Separator::default()
        }),
        "gallery" => Node::MediaGallery(MediaGallery::default()),
        "item" => Node::MediaGalleryItem(MediaGalleryItem {
            media: media(args),
            ..MediaGalleryItem::default()
        }),
        "file" => Node::File(FileComponent {
            file: media(args),
            ..FileComponent::default()
        }),
        "thumbnail" => Node::Thumbnail(Thumbnail {
            media: media(args),
            ..Thumbnail::default()
        }),
        "button" => Node::Button(Button::interactive(args, ButtonStyle::Primary)),
        "link" => {
            let (label, url) = args.rsplit_once(' ').ok_or("expected <label> <url>")?;
            Node::Button(Button::link(label.trim(), url))
        }
        "select" => Node::SelectMenu(SelectMenu::default()),
        "option" => Node::SelectMenuOption(SelectMenuOption::new(args)),
        other => return Err(format!("unknown node kind {other:?}")),
    })
}

fn action(rest: &str) -> Result<Command, String> {
    let (op, rest) = split_word(rest);
    let (set, rest) = split_word(rest);
    if set.is_empty() {
        return Err("expected an action set id".to_string());
    }
    let set = set.to_string();

    if op == "add" {
        return Ok(Command::AddAction {
            set,
            action: Action::text_response(rest),
        });
    }

    let action = index(rest)?;
    Ok(match op {
        "del" => Command::DeleteAction { set, action },
        "up" => Command::MoveActionUp { set, action },
        "down" => Command::MoveActionDown { set, action },
        "dup" => Command::DuplicateAction { set, action },
        other => return Err(format!("unknown action operation {other:?}")),
    })
}

fn attachment(rest: &str) -> Result<Command, String> {
    let (op, rest) = split_word(rest);
    match op {
        "add" => {
            let (name, size) = split_word(rest);
            Ok(Command::AddAttachment(Attachment {
                id: UniqueId::UNSET,
                name: name.to_string(),
                size: if size.is_empty() { 0 } else { index(size)? as u64 },
                description: None,
            }))
        }
        "del" => Ok(Command::RemoveAttachment(index(rest)?)),
        other => Err(format!("unknown attachment operation {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_top_level_setters() {
        assert_eq!(
            parse_line("content hello there").unwrap(),
            ReplAction::Apply(Command::SetContent("hello there".to_string()))
        );
        assert_eq!(
            parse_line("username").unwrap(),
            ReplAction::Apply(Command::SetUsername(None))
        );
        assert!(parse_line("tts maybe").is_err());
    }

    #[test]
    fn parses_embed_edits() {
        assert_eq!(
            parse_line("embed color 0 #ff0000").unwrap(),
            ReplAction::Apply(Command::EditEmbed {
                embed: 0,
                edit: EmbedEdit::Color(Some(0xFF0000)),
            })
        );
        assert_eq!(
            parse_line("field add 1 Name = Some value").unwrap(),
            ReplAction::Apply(Command::AddEmbedField {
                embed: 1,
                field: EmbedField::new("Name", "Some value"),
            })
        );
    }

    #[test]
    fn parses_node_paths() {
        let ReplAction::Apply(Command::AddNode { parent, node }) =
            parse_line("node add 2.0 link Docs https://example.com").unwrap()
        else {
            panic!("expected add node");
        };
        assert_eq!(parent, NodePath::at(2).child(0));
        assert_eq!(node, Node::Button(Button::link("Docs", "https://example.com")));

        assert_eq!(
            parse_line("node del 1.accessory").unwrap(),
            ReplAction::Apply(Command::DeleteNode(NodePath::at(1).accessory()))
        );
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_line("undo").unwrap(), ReplAction::Undo(1));
        assert_eq!(parse_line("redo 3").unwrap(), ReplAction::Redo(3));
        assert_eq!(
            parse_line("show webhook").unwrap(),
            ReplAction::Show { webhook: true }
        );
        assert!(parse_line("backup").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
