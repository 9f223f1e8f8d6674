//! Page operations for the Notion API.

use tracing::info;

use super::{NotionClient, encode};
use crate::error::NotionError;
use crate::types::PageResponse;

impl NotionClient {
    /// Retrieve a page object with its properties.
    pub fn get_page(&self, page_id: &str) -> Result<PageResponse, NotionError> {
        let url = format!("{}/pages/{}", self.base_url, encode(page_id));

        info!("Getting page {}", page_id);

        self.get_json(&url)
    }
}
