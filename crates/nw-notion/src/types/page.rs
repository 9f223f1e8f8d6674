//! Notion page objects.

use nw_compiler::{PageProperty, PageRecord, PropertyValue};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::rich_text::{RichTextItem, null_as_empty, runs};

/// Response of `GET /pages/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub id: String,
    /// Properties keyed by name.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "type")]
    property_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    title: Vec<RichTextItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    rich_text: Vec<RichTextItem>,
}

impl From<PageResponse> for PageRecord {
    fn from(page: PageResponse) -> Self {
        let properties = page
            .properties
            .into_iter()
            .map(|(name, value)| PageProperty {
                name,
                value: property_value(value),
            })
            .collect();
        Self {
            id: page.id,
            properties,
        }
    }
}

/// Decode the property kinds the compiler reads; everything else is kept by
/// type name only.
fn property_value(value: Value) -> PropertyValue {
    match serde_json::from_value::<RawProperty>(value) {
        Ok(p) if p.property_type == "title" => PropertyValue::Title(runs(p.title)),
        Ok(p) if p.property_type == "rich_text" => PropertyValue::RichText(runs(p.rich_text)),
        Ok(p) => PropertyValue::Other(p.property_type),
        Err(_) => PropertyValue::Other("unknown".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_page_title() {
        let page: PageResponse = serde_json::from_value(json!({
            "object": "page",
            "id": "p1",
            "properties": {
                "Tags": { "id": "a", "type": "multi_select", "multi_select": [] },
                "Name": {
                    "id": "title",
                    "type": "title",
                    "title": [
                        { "type": "text", "plain_text": "Hello ", "href": null },
                        { "type": "text", "plain_text": "World", "href": null }
                    ]
                }
            }
        }))
        .unwrap();

        let record = PageRecord::from(page);

        assert_eq!(record.id, "p1");
        assert_eq!(record.title().as_deref(), Some("Hello World"));
        assert!(
            record
                .properties
                .iter()
                .any(|p| p.name == "Tags" && p.value == PropertyValue::Other("multi_select".to_owned()))
        );
    }

    #[test]
    fn test_page_without_title_property() {
        let page: PageResponse = serde_json::from_value(json!({
            "id": "p2",
            "properties": {
                "Summary": {
                    "type": "rich_text",
                    "rich_text": [{ "type": "text", "plain_text": "x", "href": null }]
                }
            }
        }))
        .unwrap();

        let record = PageRecord::from(page);

        assert_eq!(record.title(), None);
    }
}
