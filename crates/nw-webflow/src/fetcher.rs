//! Plain HTTP media download.

use std::time::Duration;

use nw_compiler::{ByteFetcher, FetchedMedia, MediaError};
use tracing::debug;
use ureq::Agent;

use crate::client::create_agent;
use crate::error::WebflowError;

/// Default maximum download size (20 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Unauthenticated GET fetcher for image sources.
pub struct HttpFetcher {
    agent: Agent,
    max_bytes: u64,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: create_agent(Duration::from_secs(DEFAULT_TIMEOUT)),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Set the global request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Set the maximum accepted body size.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn get(&self, url: &str) -> Result<FetchedMedia, WebflowError> {
        let response = self.agent.get(url).call()?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WebflowError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let bytes = body_reader
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()?;

        debug!(url, bytes = bytes.len(), content_type, "Fetched media");

        Ok(FetchedMedia {
            bytes,
            content_type,
        })
    }
}

impl ByteFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedMedia, MediaError> {
        Ok(self.get(url)?)
    }
}
