//! [`BlockStore`] implementation over the Notion API.

use nw_compiler::{BlockStore, ChildrenPage, PageRecord, StoreError};

use crate::client::NotionClient;
use crate::types::{BlockChildrenResponse, RawBlock};

impl BlockStore for NotionClient {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError> {
        self.list_block_children(block_id, cursor)
            .map(children_page)
            .map_err(|e| e.into_store_error(block_id))
    }

    fn retrieve_page(&self, page_id: &str) -> Result<PageRecord, StoreError> {
        self.get_page(page_id)
            .map(PageRecord::from)
            .map_err(|e| e.into_store_error(page_id))
    }
}

/// Convert a listing response to a store page.
fn children_page(response: BlockChildrenResponse) -> ChildrenPage {
    ChildrenPage {
        results: response
            .results
            .into_iter()
            .map(RawBlock::into_listed)
            .collect(),
        next_cursor: response.next_cursor,
    }
}

#[cfg(test)]
mod tests {
    use nw_compiler::{BlockContent, BlockKind, ListedBlock, Mode, PlainHighlighter, Renderer};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_children_page_mixes_full_and_partial() {
        let response: BlockChildrenResponse = serde_json::from_value(json!({
            "object": "list",
            "results": [
                { "id": "a", "type": "divider", "has_children": false, "divider": {} },
                { "id": "b" }
            ],
            "next_cursor": "c1",
            "has_more": true
        }))
        .unwrap();

        let page = children_page(response);

        assert_eq!(page.results.len(), 2);
        assert!(matches!(&page.results[0], ListedBlock::Full(b) if b.id == "a"));
        assert_eq!(
            page.results[1],
            ListedBlock::Partial {
                id: "b".to_owned()
            }
        );
        assert_eq!(page.next_cursor.as_deref(), Some("c1"));
    }

    #[test]
    fn test_malformed_block_keeps_siblings() {
        let response: BlockChildrenResponse = serde_json::from_value(json!({
            "results": [
                {
                    "id": "a",
                    "type": "paragraph",
                    "paragraph": { "rich_text": [{ "type": "text", "plain_text": "hi" }] }
                },
                { "id": "b", "type": "code", "code": { "rich_text": 42 } },
                { "id": "c", "type": "divider", "divider": {} }
            ],
            "next_cursor": null,
            "has_more": false
        }))
        .unwrap();

        let page = children_page(response);
        let blocks: Vec<_> = page
            .results
            .into_iter()
            .map(|listed| match listed {
                ListedBlock::Full(block) => block,
                ListedBlock::Partial { id } => panic!("unexpected partial block {id}"),
            })
            .collect();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].content, BlockContent::paragraph("hi"));
        assert_eq!(blocks[1].kind(), BlockKind::Invalid("code".to_owned()));
        assert_eq!(blocks[2].content, BlockContent::Divider);

        let html = Renderer::new()
            .with_highlighter(Box::new(PlainHighlighter))
            .render_siblings(&blocks, Mode::Preview);
        assert!(html.starts_with("<p>hi</p><pre><code>Error processing block type: code\n"));
        assert!(html.ends_with("</code></pre><hr />"));
    }

    #[test]
    fn test_children_page_last() {
        let response: BlockChildrenResponse = serde_json::from_value(json!({
            "results": [],
            "next_cursor": null,
            "has_more": false
        }))
        .unwrap();

        let page = children_page(response);

        assert!(page.results.is_empty());
        assert_eq!(page.next_cursor, None);
    }
}
