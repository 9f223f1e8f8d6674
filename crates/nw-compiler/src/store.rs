//! Document store read interface and error types.
//!
//! Provides the [`BlockStore`] trait the fetcher and converter read through,
//! along with [`StoreError`] for unified error handling across store clients.

use crate::block::{Block, PageRecord};

/// One record of a children listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListedBlock {
    /// A block with a recognized kind discriminator.
    Full(Block),
    /// A record the store returned without a kind discriminator.
    Partial { id: String },
}

/// One page of a paginated children listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildrenPage {
    /// Records in store order.
    pub results: Vec<ListedBlock>,
    /// Cursor for the next page, absent on the last page.
    pub next_cursor: Option<String>,
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Block or page does not exist.
    NotFound,
    /// Credentials rejected or integration lacks access.
    PermissionDenied,
    /// Too many requests.
    RateLimited,
    /// Store is temporarily unavailable.
    Unavailable,
    /// Response could not be interpreted.
    InvalidResponse,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and client-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Block or page id the request was about.
    pub block_id: Option<String>,
    /// Client identifier (e.g., "Notion", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            block_id: None,
            backend: None,
            source: None,
        }
    }

    /// Attach the id the failing request was about.
    #[must_use]
    pub fn with_block(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    /// Attach client identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Create a not found error for an id.
    #[must_use]
    pub fn not_found(block_id: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_block(block_id)
    }

    /// Map an HTTP status code to an error kind.
    #[must_use]
    pub fn kind_for_status(status: u16) -> StoreErrorKind {
        match status {
            404 => StoreErrorKind::NotFound,
            401 | 403 => StoreErrorKind::PermissionDenied,
            429 => StoreErrorKind::RateLimited,
            500..=599 => StoreErrorKind::Unavailable,
            _ => StoreErrorKind::Other,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (block: abc)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::RateLimited => "Rate limited",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::InvalidResponse => "Invalid response",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(id) = &self.block_id {
            write!(f, " (block: {id})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to a remote document store.
///
/// Implementations must be shareable across threads: the fetcher may list
/// children of distinct subtrees concurrently.
pub trait BlockStore: Send + Sync {
    /// List one page of the children of `block_id`.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards.
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError>;

    /// Retrieve the root document record.
    fn retrieve_page(&self, page_id: &str) -> Result<PageRecord, StoreError>;
}

impl<S: BlockStore + ?Sized> BlockStore for &S {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError> {
        (**self).list_children(block_id, cursor)
    }

    fn retrieve_page(&self, page_id: &str) -> Result<PageRecord, StoreError> {
        (**self).retrieve_page(page_id)
    }
}
