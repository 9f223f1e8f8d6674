//! Notion REST API client.
//!
//! Provides a sync HTTP client for the Notion public API with bearer token
//! authentication.

mod blocks;
mod pages;

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::NotionError;

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Children per listing page. The API maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Create an HTTP agent that reports error statuses as responses.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Percent-encode a path segment or query value.
fn encode(input: &str) -> String {
    percent_encode(input.as_bytes(), QUERY_ENCODE_SET).to_string()
}

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    api_key: String,
    version: String,
    page_size: u32,
}

impl NotionClient {
    /// Create a client for the public API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            agent: create_agent(Duration::from_secs(DEFAULT_TIMEOUT)),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            version: DEFAULT_NOTION_VERSION.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Override the `Notion-Version` header.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set children per listing page (1-100).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Set the global request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// GET a JSON resource.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NotionError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Notion-Version", &self.version)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(NotionError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body = body_reader.read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}
