use super::UniqueId;

/// Rich content card attached to a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embed {
    pub id: UniqueId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// RFC 3339 timestamp shown next to the footer.
    pub timestamp: Option<String>,
    /// 0xRRGGBB
    pub color: Option<u32>,
    pub footer: Option<EmbedFooter>,
    pub author: Option<EmbedAuthor>,
    pub image: Option<EmbedMedia>,
    pub thumbnail: Option<EmbedMedia>,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// True when nothing Discord would render is set.
    pub fn has_no_content(&self) -> bool {
        is_blank(&self.description)
            && is_blank(&self.title)
            && self.author.is_none()
            && self.footer.is_none()
            && self.fields.is_empty()
            && self.image.is_none()
            && self.thumbnail.is_none()
    }

    /// Characters counted against Discord's 6000 character embed budget.
    pub fn text_len(&self) -> usize {
        let len = |s: &Option<String>| s.as_deref().map_or(0, |s| s.chars().count());
        let fields: usize = self
            .fields
            .iter()
            .map(|f| f.name.chars().count() + f.value.chars().count())
            .sum();

        len(&self.title)
            + len(&self.description)
            + self.footer.as_ref().map_or(0, |f| len(&f.text))
            + self.author.as_ref().map_or(0, |a| a.name.chars().count())
            + fields
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedFooter {
    pub text: Option<String>,
    pub icon_url: Option<String>,
}

impl EmbedFooter {
    pub fn is_empty(&self) -> bool {
        is_blank(&self.text) && is_blank(&self.icon_url)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

impl EmbedAuthor {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && is_blank(&self.url) && is_blank(&self.icon_url)
    }
}

/// Image or thumbnail reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedField {
    pub id: UniqueId,
    pub name: String,
    pub value: String,
    pub inline: Option<bool>,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: UniqueId::UNSET,
            name: name.into(),
            value: value.into(),
            inline: None,
        }
    }
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
