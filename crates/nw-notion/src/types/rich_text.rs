//! Notion rich text objects.

use nw_compiler::{Annotations, RichTextRun, RichTextVariant};
use serde::{Deserialize, Deserializer};

/// Rich text item as returned in block and property payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct RichTextItem {
    /// Item type: "text", "mention" or "equation".
    #[serde(rename = "type")]
    pub item_type: String,
    /// Rendered text. For equations, the expression.
    #[serde(default)]
    pub plain_text: String,
    /// Resolved link target.
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: RawAnnotations,
}

/// Style flags. Colors are ignored.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RawAnnotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl From<RichTextItem> for RichTextRun {
    fn from(item: RichTextItem) -> Self {
        let variant = if item.item_type == "equation" {
            RichTextVariant::Equation
        } else {
            RichTextVariant::Text
        };
        let a = item.annotations;
        Self {
            text: item.plain_text,
            annotations: Annotations {
                bold: a.bold,
                italic: a.italic,
                strikethrough: a.strikethrough,
                underline: a.underline,
                code: a.code,
            },
            link: item.href,
            variant,
        }
    }
}

/// Deserialize an array field, treating `null` like an absent field.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Convert a rich text array to runs.
pub(crate) fn runs(items: Vec<RichTextItem>) -> Vec<RichTextRun> {
    items.into_iter().map(RichTextRun::from).collect()
}
