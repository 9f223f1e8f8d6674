//! Mock store implementation for testing.
//!
//! Provides [`MockStore`] for unit testing without network access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::block::{Block, PageRecord};
use crate::store::{BlockStore, ChildrenPage, ListedBlock, StoreError, StoreErrorKind};

type PageKey = (String, Option<String>);

/// Mock store for testing.
///
/// Holds canned listings and page records in memory and records every
/// `list_children` call in order. Use the builder methods to configure it.
///
/// # Example
///
/// ```ignore
/// use nw_compiler::{Block, BlockContent, BlockStore, MockStore};
///
/// let store = MockStore::new()
///     .with_page("root", None, vec![Block::new("a", BlockContent::Divider)], Some("c1"))
///     .with_page("root", Some("c1"), vec![Block::new("b", BlockContent::Divider)], None);
///
/// let first = store.list_children("root", None).unwrap();
/// assert_eq!(first.next_cursor.as_deref(), Some("c1"));
/// assert_eq!(store.calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    pages: HashMap<PageKey, ChildrenPage>,
    records: HashMap<String, PageRecord>,
    failures: HashMap<String, StoreErrorKind>,
    calls: RwLock<Vec<PageKey>>,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one listing page of full blocks for `parent` at `cursor`.
    #[must_use]
    pub fn with_page(
        self,
        parent: &str,
        cursor: Option<&str>,
        blocks: Vec<Block>,
        next_cursor: Option<&str>,
    ) -> Self {
        let results = blocks.into_iter().map(ListedBlock::Full).collect();
        self.with_listing(parent, cursor, results, next_cursor)
    }

    /// Add one listing page of raw records for `parent` at `cursor`.
    #[must_use]
    pub fn with_listing(
        mut self,
        parent: &str,
        cursor: Option<&str>,
        results: Vec<ListedBlock>,
        next_cursor: Option<&str>,
    ) -> Self {
        self.pages.insert(
            (parent.to_owned(), cursor.map(str::to_owned)),
            ChildrenPage {
                results,
                next_cursor: next_cursor.map(str::to_owned),
            },
        );
        self
    }

    /// Add a single-page listing for `parent`.
    #[must_use]
    pub fn with_children(self, parent: &str, blocks: Vec<Block>) -> Self {
        self.with_page(parent, None, blocks, None)
    }

    /// Add a root page record.
    #[must_use]
    pub fn with_record(mut self, record: PageRecord) -> Self {
        self.records.insert(record.id.clone(), record);
        self
    }

    /// Make every request about `id` fail with `kind`.
    #[must_use]
    pub fn with_failure(mut self, id: &str, kind: StoreErrorKind) -> Self {
        self.failures.insert(id.to_owned(), kind);
        self
    }

    /// Recorded `list_children` calls as `(block_id, cursor)` in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.read().unwrap().clone()
    }

    fn check_failure(&self, id: &str) -> Result<(), StoreError> {
        match self.failures.get(id) {
            Some(kind) => Err(StoreError::new(*kind)
                .with_block(id)
                .with_backend("Mock")),
            None => Ok(()),
        }
    }
}

impl BlockStore for MockStore {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, StoreError> {
        let key = (block_id.to_owned(), cursor.map(str::to_owned));
        self.calls.write().unwrap().push(key.clone());
        self.check_failure(block_id)?;
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(block_id).with_backend("Mock"))
    }

    fn retrieve_page(&self, page_id: &str) -> Result<PageRecord, StoreError> {
        self.check_failure(page_id)?;
        self.records
            .get(page_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(page_id).with_backend("Mock"))
    }
}
