//! Top-level page conversion.
//!
//! A [`Converter`] resolves the root page, fetches its block tree and renders
//! it. Store and depth failures abort the whole conversion; block failures
//! are isolated by the renderer.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::block::{Block, PageRecord};
use crate::error::ConvertError;
use crate::fetcher::{DEFAULT_MAX_DEPTH, TreeFetcher};
use crate::render::Renderer;
use crate::store::BlockStore;

/// Title used when the page has no title property.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Rendering mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Live preview: no side effects, media URLs pass through.
    #[default]
    Preview,
    /// Publish: media is re-hosted and output is wrapped as an embed.
    Publish,
}

impl Mode {
    #[must_use]
    pub fn from_publish_flag(publish: bool) -> Self {
        if publish { Self::Publish } else { Self::Preview }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preview => f.write_str("preview"),
            Self::Publish => f.write_str("publish"),
        }
    }
}

/// Successful conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub title: String,
    pub markup: String,
    /// Root page record as returned by the store.
    pub page: PageRecord,
    /// Fetched block tree.
    pub blocks: Vec<Block>,
}

/// Serializable outcome of a conversion: success fields or `error`, never both.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    /// Whether the conversion failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Result<Conversion, ConvertError>> for ConversionResult {
    fn from(result: Result<Conversion, ConvertError>) -> Self {
        match result {
            Ok(conversion) => Self {
                title: Some(conversion.title),
                markup: Some(conversion.markup),
                page: Some(conversion.page),
                blocks: Some(conversion.blocks),
                error: None,
            },
            Err(e) => Self {
                error: Some(e.to_string()),
                ..Self::default()
            },
        }
    }
}

/// Page-to-markup converter.
///
/// # Example
///
/// ```ignore
/// use nw_compiler::{Converter, Mode, Renderer};
///
/// let converter = Converter::new(store, Renderer::new()).with_max_depth(16);
/// let conversion = converter.convert("page-id", Mode::Preview)?;
/// println!("{}", conversion.markup);
/// ```
pub struct Converter<S: BlockStore> {
    store: S,
    renderer: Renderer,
    max_depth: usize,
    parallel_fetch: bool,
}

impl<S: BlockStore> Converter<S> {
    #[must_use]
    pub fn new(store: S, renderer: Renderer) -> Self {
        Self {
            store,
            renderer,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel_fetch: false,
        }
    }

    /// Set maximum block nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fetch sibling subtrees in parallel.
    #[must_use]
    pub fn with_parallel_fetch(mut self, parallel: bool) -> Self {
        self.parallel_fetch = parallel;
        self
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Convert the page `root_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Page`] if the root page cannot be retrieved and
    /// [`ConvertError::Fetch`] if the block tree cannot be fetched.
    pub fn convert(&self, root_id: &str, mode: Mode) -> Result<Conversion, ConvertError> {
        info!(page = root_id, %mode, "Converting page");

        let page = self
            .store
            .retrieve_page(root_id)
            .map_err(ConvertError::Page)?;
        let title = page.title().unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        let blocks = TreeFetcher::new(&self.store)
            .with_max_depth(self.max_depth)
            .with_parallel(self.parallel_fetch)
            .fetch_tree(root_id)?;

        let body = self.renderer.render_siblings(&blocks, mode);
        let markup = match mode {
            Mode::Publish => format!("<div data-rt-embed-type='true'>{body}</div>"),
            Mode::Preview => body,
        };

        info!(
            page = root_id,
            %mode,
            blocks = count_blocks(&blocks),
            bytes = markup.len(),
            "Converted page"
        );

        Ok(Conversion {
            title,
            markup,
            page,
            blocks,
        })
    }

    /// Convert and flatten the outcome into a [`ConversionResult`].
    #[must_use]
    pub fn convert_to_result(&self, root_id: &str, mode: Mode) -> ConversionResult {
        self.convert(root_id, mode).into()
    }
}

fn count_blocks(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|block| 1 + count_blocks(&block.children))
        .sum()
}
