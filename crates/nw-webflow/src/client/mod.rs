//! Webflow Data API client.
//!
//! Provides a sync HTTP client for the Webflow v2 API with bearer token
//! authentication. Only asset upload is implemented.

mod assets;
mod multipart;

use std::time::Duration;

use nw_compiler::{AssetUploader, MediaError};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::Agent;

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.webflow.com/v2";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Create an HTTP agent that reports error statuses as responses.
pub(crate) fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Webflow Data API client bound to one site.
pub struct WebflowClient {
    agent: Agent,
    base_url: String,
    api_key: String,
    site_id: String,
}

impl WebflowClient {
    /// Create a client for the public API.
    #[must_use]
    pub fn new(api_key: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            agent: create_agent(Duration::from_secs(DEFAULT_TIMEOUT)),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            site_id: site_id.into(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Set the global request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Asset collection URL of the configured site.
    fn assets_url(&self) -> String {
        format!(
            "{}/sites/{}/assets",
            self.base_url,
            utf8_percent_encode(&self.site_id, NON_ALPHANUMERIC)
        )
    }
}

impl AssetUploader for WebflowClient {
    fn upload(&self, bytes: &[u8], content_type: &str, name: &str) -> Result<String, MediaError> {
        Ok(self.upload_asset(bytes, content_type, name)?)
    }
}
