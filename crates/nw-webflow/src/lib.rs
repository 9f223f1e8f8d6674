//! Webflow integration for nw.
//!
//! - [`WebflowClient`] uploads images as site assets and implements
//!   [`nw_compiler::AssetUploader`]
//! - [`HttpFetcher`] downloads image sources and implements
//!   [`nw_compiler::ByteFetcher`]
//!
//! Together they form the publish-mode media pipeline:
//!
//! ```ignore
//! use nw_compiler::{MediaResolver, Renderer};
//! use nw_webflow::{HttpFetcher, WebflowClient};
//!
//! let media = MediaResolver::new(
//!     Box::new(HttpFetcher::new()),
//!     Box::new(WebflowClient::new(api_key, site_id)),
//! );
//! let renderer = Renderer::new().with_media(media);
//! ```

mod client;
mod error;
mod fetcher;
pub mod types;

pub use client::{DEFAULT_BASE_URL, WebflowClient};
pub use error::WebflowError;
pub use fetcher::{DEFAULT_MAX_BYTES, HttpFetcher};
