//! Error types for fetching, rendering and conversion.

use crate::block::BlockKind;
use crate::store::StoreError;

/// Error while reconstructing a block tree.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// A children listing failed.
    #[error("failed to list children: {0}")]
    Store(#[from] StoreError),

    /// The tree nests deeper than the configured maximum.
    #[error("block tree exceeds maximum depth of {max_depth} (at block {block_id})")]
    DepthExceeded {
        /// Configured maximum depth.
        max_depth: usize,
        /// Block whose children would have exceeded it.
        block_id: String,
    },
}

/// Failure of a single block.
///
/// Never escapes the sibling pass: it is replaced with an inline error
/// fragment in place of the block.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The block kind has no markup shape.
    #[error("{0} block not supported")]
    UnsupportedBlock(BlockKind),

    /// The store returned a payload that does not match the block kind.
    #[error("invalid {kind} payload: {detail}")]
    InvalidPayload { kind: String, detail: String },

    /// A collaborator panicked while rendering the block.
    #[error("panicked while rendering: {0}")]
    Panicked(String),
}

/// Error that aborts a whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The root document could not be retrieved.
    #[error("failed to retrieve page: {0}")]
    Page(#[source] StoreError),

    /// The block tree could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;

    #[test]
    fn test_depth_exceeded_message() {
        let err = FetchError::DepthExceeded {
            max_depth: 3,
            block_id: "b7".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "block tree exceeds maximum depth of 3 (at block b7)"
        );
    }

    #[test]
    fn test_render_error_names_kind() {
        let err = RenderError::UnsupportedBlock(BlockKind::File);
        assert_eq!(err.to_string(), "file block not supported");
    }

    #[test]
    fn test_convert_error_from_fetch() {
        let err: ConvertError =
            FetchError::Store(StoreError::new(StoreErrorKind::RateLimited)).into();
        assert_eq!(err.to_string(), "failed to list children: Rate limited");
    }
}
