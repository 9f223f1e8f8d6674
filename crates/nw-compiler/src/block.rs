//! Block tree model.
//!
//! A [`Block`] owns its children directly. Trees are built once per conversion
//! by the [`TreeFetcher`](crate::TreeFetcher) and never mutated afterwards.

use serde::Serialize;

/// One content node of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Opaque identifier, unique within a document.
    pub id: String,
    /// Whether the store reports nested content for this block.
    pub has_children: bool,
    /// Kind-specific payload.
    pub content: BlockContent,
    /// Ordered children. Empty until the fetcher attaches them.
    pub children: Vec<Block>,
}

impl Block {
    /// Create a leaf block.
    #[must_use]
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            content,
            children: Vec::new(),
        }
    }

    /// Attach children, marking the block as having them.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = true;
        self.children = children;
        self
    }

    /// Mark the block as having children without attaching any.
    ///
    /// This is the shape the store hands out before the fetcher descends.
    #[must_use]
    pub fn with_unfetched_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Discriminant of the payload.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

/// Kind-specific block payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Paragraph { text: Vec<RichTextRun> },
    #[serde(rename = "heading_1")]
    Heading1 { text: Vec<RichTextRun> },
    #[serde(rename = "heading_2")]
    Heading2 { text: Vec<RichTextRun> },
    #[serde(rename = "heading_3")]
    Heading3 { text: Vec<RichTextRun> },
    BulletedListItem { text: Vec<RichTextRun> },
    NumberedListItem { text: Vec<RichTextRun> },
    #[serde(rename = "to_do")]
    Todo {
        text: Vec<RichTextRun>,
        checked: bool,
    },
    Toggle { text: Vec<RichTextRun> },
    Code {
        /// Concatenated plain text of the code runs.
        text: String,
        /// Language tag as supplied by the store.
        language: Option<String>,
    },
    Quote { text: Vec<RichTextRun> },
    Callout {
        text: Vec<RichTextRun>,
        /// Emoji icon, if the store supplied one.
        icon: Option<String>,
    },
    Divider,
    Image(Media),
    Video(Media),
    File(Media),
    Bookmark {
        url: String,
        caption: Vec<RichTextRun>,
    },
    Table {
        /// Column count reported by the store.
        width: usize,
    },
    TableRow { cells: Vec<Vec<RichTextRun>> },
    /// A kind the model does not know, keeping the store's name for it.
    Unsupported { kind: String },
    /// A known kind whose payload could not be decoded.
    Invalid { kind: String, detail: String },
}

impl BlockContent {
    /// Fieldless discriminant of this payload.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph { .. } => BlockKind::Paragraph,
            Self::Heading1 { .. } => BlockKind::Heading1,
            Self::Heading2 { .. } => BlockKind::Heading2,
            Self::Heading3 { .. } => BlockKind::Heading3,
            Self::BulletedListItem { .. } => BlockKind::BulletedListItem,
            Self::NumberedListItem { .. } => BlockKind::NumberedListItem,
            Self::Todo { .. } => BlockKind::Todo,
            Self::Toggle { .. } => BlockKind::Toggle,
            Self::Code { .. } => BlockKind::Code,
            Self::Quote { .. } => BlockKind::Quote,
            Self::Callout { .. } => BlockKind::Callout,
            Self::Divider => BlockKind::Divider,
            Self::Image(_) => BlockKind::Image,
            Self::Video(_) => BlockKind::Video,
            Self::File(_) => BlockKind::File,
            Self::Bookmark { .. } => BlockKind::Bookmark,
            Self::Table { .. } => BlockKind::Table,
            Self::TableRow { .. } => BlockKind::TableRow,
            Self::Unsupported { kind } => BlockKind::Unsupported(kind.clone()),
            Self::Invalid { kind, .. } => BlockKind::Invalid(kind.clone()),
        }
    }

    /// Shorthand for a paragraph of plain runs.
    #[must_use]
    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph {
            text: vec![RichTextRun::plain(text)],
        }
    }

    /// Shorthand for a bulleted list item with one plain run.
    #[must_use]
    pub fn bulleted(text: &str) -> Self {
        Self::BulletedListItem {
            text: vec![RichTextRun::plain(text)],
        }
    }

    /// Shorthand for a numbered list item with one plain run.
    #[must_use]
    pub fn numbered(text: &str) -> Self {
        Self::NumberedListItem {
            text: vec![RichTextRun::plain(text)],
        }
    }
}

/// Block discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Todo,
    Toggle,
    Code,
    Quote,
    Callout,
    Divider,
    Image,
    Video,
    File,
    Bookmark,
    Table,
    TableRow,
    Unsupported(String),
    /// Known wire name with an undecodable payload.
    Invalid(String),
}

impl BlockKind {
    /// Wire name used by the document store.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::Todo => "to_do",
            Self::Toggle => "toggle",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Callout => "callout",
            Self::Divider => "divider",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Bookmark => "bookmark",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::Unsupported(name) | Self::Invalid(name) => name,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Media reference carried by image, video and file blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Media {
    /// Source URL (external link or store-hosted file).
    pub url: String,
    /// Optional caption runs.
    pub caption: Vec<RichTextRun>,
}

impl Media {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: Vec::new(),
        }
    }
}

/// Atomic inline span of formatted text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RichTextRun {
    /// Displayed text (for equations, the expression source).
    pub text: String,
    pub annotations: Annotations,
    /// Hyperlink target.
    pub link: Option<String>,
    pub variant: RichTextVariant,
}

impl RichTextRun {
    /// Create an unannotated text run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create an equation run.
    #[must_use]
    pub fn equation(expression: impl Into<String>) -> Self {
        Self {
            text: expression.into(),
            variant: RichTextVariant::Equation,
            ..Self::default()
        }
    }

    /// Set annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Set hyperlink target.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Independent style flags of a run.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// Run variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RichTextVariant {
    #[default]
    Text,
    Equation,
}

/// Concatenate the plain text of a run sequence.
#[must_use]
pub fn plain_text(runs: &[RichTextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Root document record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub id: String,
    /// Properties in store order.
    pub properties: Vec<PageProperty>,
}

impl PageRecord {
    /// Title from the first title-kind property, joined as plain text.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.properties.iter().find_map(|prop| match &prop.value {
            PropertyValue::Title(runs) => Some(plain_text(runs)),
            _ => None,
        })
    }
}

/// Named page property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageProperty {
    pub name: String,
    pub value: PropertyValue,
}

/// Property payload. Only the kinds the compiler reads are modelled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichTextRun>),
    RichText(Vec<RichTextRun>),
    /// Any other property kind, by name.
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_store() {
        assert_eq!(BlockKind::Heading2.name(), "heading_2");
        assert_eq!(BlockKind::Todo.name(), "to_do");
        assert_eq!(BlockKind::TableRow.name(), "table_row");
        assert_eq!(
            BlockKind::Unsupported("synced_block".to_owned()).to_string(),
            "synced_block"
        );
    }

    #[test]
    fn test_invalid_kind_keeps_wire_name() {
        let content = BlockContent::Invalid {
            kind: "code".to_owned(),
            detail: "bad".to_owned(),
        };
        assert_eq!(content.kind(), BlockKind::Invalid("code".to_owned()));
        assert_eq!(content.kind().name(), "code");
    }

    #[test]
    fn test_content_kind() {
        let block = Block::new("b1", BlockContent::bulleted("item"));
        assert_eq!(block.kind(), BlockKind::BulletedListItem);
        assert!(!block.has_children);
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_with_children_sets_flag() {
        let block = Block::new("t", BlockContent::Toggle { text: vec![] })
            .with_children(vec![Block::new("c", BlockContent::Divider)]);
        assert!(block.has_children);
        assert_eq!(block.children.len(), 1);
    }

    #[test]
    fn test_page_title_first_title_property() {
        let page = PageRecord {
            id: "p".to_owned(),
            properties: vec![
                PageProperty {
                    name: "Tags".to_owned(),
                    value: PropertyValue::Other("multi_select".to_owned()),
                },
                PageProperty {
                    name: "Name".to_owned(),
                    value: PropertyValue::Title(vec![
                        RichTextRun::plain("Hello "),
                        RichTextRun::plain("World"),
                    ]),
                },
            ],
        };
        assert_eq!(page.title().as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_page_title_missing() {
        let page = PageRecord {
            id: "p".to_owned(),
            properties: vec![PageProperty {
                name: "Summary".to_owned(),
                value: PropertyValue::RichText(vec![RichTextRun::plain("x")]),
            }],
        };
        assert_eq!(page.title(), None);
    }
}
