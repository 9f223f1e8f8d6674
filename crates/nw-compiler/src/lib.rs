//! Notion block tree compiler.
//!
//! This crate turns a remotely stored block tree into one HTML string for
//! embedding in a Webflow page:
//!
//! - [`TreeFetcher`] rebuilds the ordered tree from a paginated
//!   [`BlockStore`] listing
//! - [`Renderer`] renders blocks to HTML, grouping consecutive list items and
//!   isolating per-block failures
//! - [`Converter`] ties both together for one page and one [`Mode`]
//!
//! Network-facing collaborators ([`BlockStore`], [`ByteFetcher`],
//! [`AssetUploader`], [`Highlighter`]) are traits; concrete clients live in
//! the `nw-notion` and `nw-webflow` crates.
//!
//! # Example
//!
//! ```
//! use nw_compiler::{Block, BlockContent, Mode, Renderer};
//!
//! let blocks = vec![
//!     Block::new("h", BlockContent::Heading1 { text: vec![] }),
//!     Block::new("p", BlockContent::paragraph("Hello")),
//! ];
//! let html = Renderer::new().render_siblings(&blocks, Mode::Preview);
//! assert_eq!(html, "<h1></h1><p>Hello</p>");
//! ```

mod block;
mod convert;
mod error;
mod fetcher;
mod group;
mod highlight;
mod inline;
mod media;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod render;
mod slug;
mod store;

pub use block::{
    Annotations, Block, BlockContent, BlockKind, Media, PageProperty, PageRecord, PropertyValue,
    RichTextRun, RichTextVariant, plain_text,
};
pub use convert::{Conversion, ConversionResult, Converter, DEFAULT_TITLE, Mode};
pub use error::{ConvertError, FetchError, RenderError};
pub use fetcher::{DEFAULT_MAX_DEPTH, TreeFetcher};
pub use group::{GroupState, ListGroup, ListKind, group_siblings};
#[cfg(feature = "highlight")]
pub use highlight::SyntectHighlighter;
pub use highlight::{
    DEFAULT_THEME, HighlightError, Highlighter, PlainHighlighter, default_highlighter,
};
pub use inline::{escape_html, render_rich_text};
pub use media::{
    AssetUploader, ByteFetcher, DEFAULT_ASSET_NAME, DEFAULT_CONTENT_TYPE, FetchedMedia,
    MediaError, MediaResolver, asset_name_from_url,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStore;
pub use render::Renderer;
pub use slug::slugify;
pub use store::{BlockStore, ChildrenPage, ListedBlock, StoreError, StoreErrorKind};
