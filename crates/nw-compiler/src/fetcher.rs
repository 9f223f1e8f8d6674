//! Recursive, paginated block tree retrieval.
//!
//! Reconstructs the full ordered tree below a root id from a flat,
//! cursor-paginated children listing:
//! - Pages are concatenated in the order received (never reordered or deduped)
//! - Blocks flagged `has_children` are descended into before returning
//! - Records without a kind discriminator are dropped
//! - Descent depth is capped; exceeding the cap fails the whole fetch
//! - A cursor repeated for the same parent fails the fetch instead of looping
//!
//! With parallel descent enabled, subtrees of distinct siblings are fetched on
//! the rayon pool. Sibling order is preserved by the ordered collect.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::block::Block;
use crate::error::FetchError;
use crate::store::{BlockStore, ListedBlock, StoreError, StoreErrorKind};

/// Default maximum nesting depth below the root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Block tree fetcher over a [`BlockStore`].
pub struct TreeFetcher<'a, S: BlockStore + ?Sized> {
    store: &'a S,
    max_depth: usize,
    parallel: bool,
}

impl<'a, S: BlockStore + ?Sized> TreeFetcher<'a, S> {
    /// Create a sequential fetcher with the default depth cap.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
        }
    }

    /// Set maximum nesting depth below the root.
    ///
    /// The root's own children are depth 1.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable parallel descent into sibling subtrees.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fetch the ordered children of `root_id` with their full subtrees.
    pub fn fetch_tree(&self, root_id: &str) -> Result<Vec<Block>, FetchError> {
        self.fetch_level(root_id, 1)
    }

    fn fetch_level(&self, parent_id: &str, depth: usize) -> Result<Vec<Block>, FetchError> {
        if depth > self.max_depth {
            return Err(FetchError::DepthExceeded {
                max_depth: self.max_depth,
                block_id: parent_id.to_owned(),
            });
        }

        let blocks = self.list_all(parent_id)?;

        if self.parallel {
            blocks
                .into_par_iter()
                .map(|block| self.attach_children(block, depth))
                .collect()
        } else {
            blocks
                .into_iter()
                .map(|block| self.attach_children(block, depth))
                .collect()
        }
    }

    /// Follow the cursor chain for one parent and concatenate the pages.
    fn list_all(&self, parent_id: &str) -> Result<Vec<Block>, FetchError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let page = self.store.list_children(parent_id, cursor.as_deref())?;
            debug!(
                parent = parent_id,
                count = page.results.len(),
                has_more = page.next_cursor.is_some(),
                "Fetched children page"
            );

            for listed in page.results {
                match listed {
                    ListedBlock::Full(block) => blocks.push(block),
                    ListedBlock::Partial { id } => {
                        debug!(block = %id, "Dropping block without kind");
                    }
                }
            }

            match page.next_cursor {
                Some(next) => {
                    if !seen.insert(next.clone()) {
                        return Err(StoreError::new(StoreErrorKind::InvalidResponse)
                            .with_block(parent_id)
                            .with_source(format!("cursor {next} repeated"))
                            .into());
                    }
                    cursor = Some(next);
                }
                None => break,
            }
        }

        Ok(blocks)
    }

    fn attach_children(&self, mut block: Block, depth: usize) -> Result<Block, FetchError> {
        if block.has_children {
            block.children = self.fetch_level(&block.id, depth + 1)?;
        } else {
            block.children.clear();
        }
        Ok(block)
    }
}
