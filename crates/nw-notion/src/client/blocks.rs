//! Block children operations for the Notion API.

use tracing::debug;

use super::{NotionClient, encode};
use crate::error::NotionError;
use crate::types::BlockChildrenResponse;

impl NotionClient {
    /// List one page of a block's children.
    pub fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildrenResponse, NotionError> {
        let url = self.children_url(block_id, cursor);

        debug!(block = block_id, cursor, "Listing block children");

        let response: BlockChildrenResponse = self.get_json(&url)?;
        debug!(
            block = block_id,
            count = response.results.len(),
            has_more = response.has_more,
            "Listed block children"
        );
        Ok(response)
    }

    fn children_url(&self, block_id: &str, cursor: Option<&str>) -> String {
        let mut url = format!(
            "{}/blocks/{}/children?page_size={}",
            self.base_url,
            encode(block_id),
            self.page_size
        );
        if let Some(cursor) = cursor {
            url.push_str("&start_cursor=");
            url.push_str(&encode(cursor));
        }
        url
    }
}
