//! Image externalization policy.
//!
//! In preview mode image URLs pass through untouched and no network access
//! happens. In publish mode each image is fetched and re-hosted through an
//! [`AssetUploader`]; any failure degrades to the source URL.

use tracing::{debug, warn};

use crate::convert::Mode;

/// Content type assumed when the fetch response carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Asset name used when the URL has no usable path segment.
pub const DEFAULT_ASSET_NAME: &str = "unknown.jpg";

/// Downloaded media bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    /// Content type reported by the source, if any.
    pub content_type: Option<String>,
}

/// Media transfer failure.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote answered with an error status.
    #[error("HTTP {status}: {body}")]
    HttpResponse { status: u16, body: String },

    /// The remote answered with an unusable payload.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Downloads bytes from a URL.
pub trait ByteFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedMedia, MediaError>;
}

/// Uploads bytes to the destination asset store.
pub trait AssetUploader: Send + Sync {
    /// Upload `bytes` under `name` and return the hosted URL.
    fn upload(&self, bytes: &[u8], content_type: &str, name: &str) -> Result<String, MediaError>;
}

/// Mode-aware image URL resolver.
pub struct MediaResolver {
    fetcher: Box<dyn ByteFetcher>,
    uploader: Box<dyn AssetUploader>,
}

impl MediaResolver {
    #[must_use]
    pub fn new(fetcher: Box<dyn ByteFetcher>, uploader: Box<dyn AssetUploader>) -> Self {
        Self { fetcher, uploader }
    }

    /// Resolve the URL to embed for an image.
    ///
    /// Never fails: publish-mode errors are logged and the source URL is
    /// returned instead.
    #[must_use]
    pub fn resolve(&self, url: &str, mode: Mode) -> String {
        if mode == Mode::Preview {
            return url.to_owned();
        }

        match self.externalize(url) {
            Ok(hosted) => {
                debug!(source = url, hosted = %hosted, "Externalized image");
                hosted
            }
            Err(e) => {
                warn!(source = url, error = %e, "Image upload failed, using source URL");
                url.to_owned()
            }
        }
    }

    fn externalize(&self, url: &str) -> Result<String, MediaError> {
        let media = self.fetcher.fetch(url)?;
        let content_type = media
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let name = asset_name_from_url(url);
        self.uploader.upload(&media.bytes, content_type, &name)
    }
}

/// Derive an asset file name from the last URL path segment.
///
/// A path ending in `/` has an empty last segment and gets the default name.
#[must_use]
pub fn asset_name_from_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| {
            rest.find('/').map_or("", |idx| &rest[idx..])
        });

    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| DEFAULT_ASSET_NAME.to_owned(), str::to_owned)
}
