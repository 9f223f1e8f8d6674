//! Notion block objects.
//!
//! A block carries its type name in `type` and the payload under a key of the
//! same name. The payload is decoded lazily once the type is known. A payload
//! that does not decode becomes [`BlockContent::Invalid`] so the failure stays
//! with that block.

use std::collections::HashMap;

use nw_compiler::{Block, BlockContent, ListedBlock, Media, plain_text};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::rich_text::{RichTextItem, null_as_empty, runs};

/// Response of `GET /blocks/{id}/children`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildrenResponse {
    pub results: Vec<RawBlock>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Block object. Partial objects carry only `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub payloads: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    rich_text: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct TodoPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Deserialize)]
struct CalloutPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    rich_text: Vec<RichTextItem>,
    #[serde(default)]
    icon: Option<Icon>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Icon {
    Emoji { emoji: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct FilePayload {
    #[serde(default)]
    external: Option<UrlRef>,
    #[serde(default)]
    file: Option<UrlRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct UrlRef {
    url: String,
}

#[derive(Deserialize)]
struct BookmarkPayload {
    #[serde(default)]
    url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    caption: Vec<RichTextItem>,
}

#[derive(Deserialize)]
struct TablePayload {
    #[serde(default)]
    table_width: usize,
}

#[derive(Deserialize)]
struct TableRowPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    cells: Vec<Vec<RichTextItem>>,
}

impl RawBlock {
    /// Convert to the compiler's block model.
    ///
    /// Objects without a type become [`ListedBlock::Partial`]. Unknown types
    /// become [`BlockContent::Unsupported`] and malformed payloads of known
    /// types become [`BlockContent::Invalid`].
    pub fn into_listed(mut self) -> ListedBlock {
        let Some(block_type) = self.block_type.take() else {
            return ListedBlock::Partial { id: self.id };
        };
        let payload = self
            .payloads
            .remove(&block_type)
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let content = decode_content(&block_type, payload).unwrap_or_else(|e| {
            warn!(block = %self.id, kind = %block_type, error = %e, "Malformed block payload");
            BlockContent::Invalid {
                kind: block_type.clone(),
                detail: e.to_string(),
            }
        });

        let mut block = Block::new(self.id, content);
        block.has_children = self.has_children;
        ListedBlock::Full(block)
    }
}

fn decode_content(block_type: &str, payload: Value) -> Result<BlockContent, serde_json::Error> {
    let text = |value: Value| decode(value).map(|p: TextPayload| runs(p.rich_text));

    let content = match block_type {
        "paragraph" => BlockContent::Paragraph { text: text(payload)? },
        "heading_1" => BlockContent::Heading1 { text: text(payload)? },
        "heading_2" => BlockContent::Heading2 { text: text(payload)? },
        "heading_3" => BlockContent::Heading3 { text: text(payload)? },
        "bulleted_list_item" => BlockContent::BulletedListItem { text: text(payload)? },
        "numbered_list_item" => BlockContent::NumberedListItem { text: text(payload)? },
        "toggle" => BlockContent::Toggle { text: text(payload)? },
        "quote" => BlockContent::Quote { text: text(payload)? },
        "to_do" => {
            let p: TodoPayload = decode(payload)?;
            BlockContent::Todo {
                text: runs(p.rich_text),
                checked: p.checked,
            }
        }
        "code" => {
            let p: CodePayload = decode(payload)?;
            BlockContent::Code {
                text: plain_text(&runs(p.rich_text)),
                language: p.language,
            }
        }
        "callout" => {
            let p: CalloutPayload = decode(payload)?;
            BlockContent::Callout {
                text: runs(p.rich_text),
                icon: match p.icon {
                    Some(Icon::Emoji { emoji }) => Some(emoji),
                    Some(Icon::Other) | None => None,
                },
            }
        }
        "divider" => BlockContent::Divider,
        "image" => BlockContent::Image(media(decode(payload)?)),
        "video" => BlockContent::Video(media(decode(payload)?)),
        "file" => BlockContent::File(media(decode(payload)?)),
        "bookmark" => {
            let p: BookmarkPayload = decode(payload)?;
            BlockContent::Bookmark {
                url: p.url,
                caption: runs(p.caption),
            }
        }
        "table" => {
            let p: TablePayload = decode(payload)?;
            BlockContent::Table {
                width: p.table_width,
            }
        }
        "table_row" => {
            let p: TableRowPayload = decode(payload)?;
            BlockContent::TableRow {
                cells: p.cells.into_iter().map(runs).collect(),
            }
        }
        other => BlockContent::Unsupported {
            kind: other.to_owned(),
        },
    };
    Ok(content)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Resolve a file object: external link or Notion-hosted file.
fn media(payload: FilePayload) -> Media {
    let url = payload
        .external
        .or(payload.file)
        .map(|r| r.url)
        .unwrap_or_default();
    Media {
        url,
        caption: runs(payload.caption),
    }
}

#[cfg(test)]
mod tests {
    use nw_compiler::{BlockKind, RichTextRun};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> ListedBlock {
        serde_json::from_value::<RawBlock>(value)
            .unwrap()
            .into_listed()
    }

    fn full(value: Value) -> Block {
        match parse(value) {
            ListedBlock::Full(block) => block,
            ListedBlock::Partial { id } => panic!("unexpected partial block {id}"),
        }
    }

    fn text_item(s: &str) -> Value {
        json!({ "type": "text", "text": { "content": s }, "plain_text": s, "href": null })
    }

    #[test]
    fn test_paragraph() {
        let block = full(json!({
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": { "rich_text": [text_item("Hello")], "color": "default" }
        }));

        assert_eq!(block.id, "b1");
        assert!(!block.has_children);
        assert_eq!(
            block.content,
            BlockContent::Paragraph {
                text: vec![RichTextRun::plain("Hello")]
            }
        );
    }

    #[test]
    fn test_partial_block_without_type() {
        let listed = parse(json!({ "object": "block", "id": "ghost" }));
        assert_eq!(
            listed,
            ListedBlock::Partial {
                id: "ghost".to_owned()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let block = full(json!({
            "id": "s",
            "type": "synced_block",
            "has_children": true,
            "synced_block": { "synced_from": null }
        }));

        assert_eq!(block.kind(), BlockKind::Unsupported("synced_block".to_owned()));
        assert!(block.has_children);
    }

    #[test]
    fn test_todo_checked() {
        let block = full(json!({
            "id": "t",
            "type": "to_do",
            "to_do": { "rich_text": [text_item("done")], "checked": true }
        }));

        assert_eq!(
            block.content,
            BlockContent::Todo {
                text: vec![RichTextRun::plain("done")],
                checked: true
            }
        );
    }

    #[test]
    fn test_code_joins_plain_text() {
        let block = full(json!({
            "id": "c",
            "type": "code",
            "code": {
                "rich_text": [text_item("fn main() {\n"), text_item("}")],
                "language": "rust",
                "caption": []
            }
        }));

        assert_eq!(
            block.content,
            BlockContent::Code {
                text: "fn main() {\n}".to_owned(),
                language: Some("rust".to_owned())
            }
        );
    }

    #[test]
    fn test_callout_keeps_only_emoji_icon() {
        let emoji = full(json!({
            "id": "c1",
            "type": "callout",
            "callout": { "rich_text": [], "icon": { "type": "emoji", "emoji": "🚀" } }
        }));
        let external = full(json!({
            "id": "c2",
            "type": "callout",
            "callout": {
                "rich_text": [],
                "icon": { "type": "external", "external": { "url": "https://x/icon.png" } }
            }
        }));

        assert!(matches!(emoji.content, BlockContent::Callout { icon: Some(ref i), .. } if i == "🚀"));
        assert!(matches!(external.content, BlockContent::Callout { icon: None, .. }));
    }

    #[test]
    fn test_image_external_and_file_sources() {
        let external = full(json!({
            "id": "i1",
            "type": "image",
            "image": {
                "type": "external",
                "external": { "url": "https://example.com/a.png" },
                "caption": [text_item("A cat")]
            }
        }));
        let hosted = full(json!({
            "id": "i2",
            "type": "image",
            "image": {
                "type": "file",
                "file": { "url": "https://s3.aws.com/b.png", "expiry_time": "2026-01-01T00:00:00.000Z" },
                "caption": []
            }
        }));

        assert_eq!(
            external.content,
            BlockContent::Image(Media {
                url: "https://example.com/a.png".to_owned(),
                caption: vec![RichTextRun::plain("A cat")],
            })
        );
        assert_eq!(
            hosted.content,
            BlockContent::Image(Media::new("https://s3.aws.com/b.png"))
        );
    }

    #[test]
    fn test_table_and_rows() {
        let table = full(json!({
            "id": "t",
            "type": "table",
            "has_children": true,
            "table": { "table_width": 2, "has_column_header": false, "has_row_header": false }
        }));
        let row = full(json!({
            "id": "r",
            "type": "table_row",
            "table_row": { "cells": [[text_item("a")], []] }
        }));

        assert_eq!(table.content, BlockContent::Table { width: 2 });
        assert_eq!(
            row.content,
            BlockContent::TableRow {
                cells: vec![vec![RichTextRun::plain("a")], vec![]]
            }
        );
    }

    #[test]
    fn test_bookmark() {
        let block = full(json!({
            "id": "b",
            "type": "bookmark",
            "bookmark": { "url": "https://rust-lang.org", "caption": [] }
        }));

        assert_eq!(
            block.content,
            BlockContent::Bookmark {
                url: "https://rust-lang.org".to_owned(),
                caption: vec![]
            }
        );
    }

    #[test]
    fn test_malformed_payload_becomes_invalid_block() {
        let block = full(json!({
            "id": "bad",
            "type": "to_do",
            "has_children": true,
            "to_do": { "rich_text": "not a list" }
        }));

        assert_eq!(block.id, "bad");
        assert!(block.has_children);
        assert_eq!(block.kind(), BlockKind::Invalid("to_do".to_owned()));
        assert!(matches!(
            block.content,
            BlockContent::Invalid { ref detail, .. } if detail.contains("invalid type: string")
        ));
    }

    #[test]
    fn test_null_rich_text_is_empty() {
        let code = full(json!({
            "id": "c",
            "type": "code",
            "code": { "rich_text": null, "language": "rust" }
        }));
        let image = full(json!({
            "id": "i",
            "type": "image",
            "image": { "external": { "url": "https://example.com/a.png" }, "caption": null }
        }));

        assert_eq!(
            code.content,
            BlockContent::Code {
                text: String::new(),
                language: Some("rust".to_owned())
            }
        );
        assert_eq!(
            image.content,
            BlockContent::Image(Media::new("https://example.com/a.png"))
        );
    }

    #[test]
    fn test_children_response_cursor() {
        let response: BlockChildrenResponse = serde_json::from_value(json!({
            "object": "list",
            "results": [{ "id": "x" }],
            "next_cursor": "abc",
            "has_more": true
        }))
        .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.next_cursor.as_deref(), Some("abc"));
        assert!(response.has_more);
    }
}
