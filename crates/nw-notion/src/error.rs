//! Error types for the Notion client.

use nw_compiler::{StoreError, StoreErrorKind};

/// Error from Notion API operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl NotionError {
    /// Semantic store error category.
    #[must_use]
    pub fn store_kind(&self) -> StoreErrorKind {
        match self {
            Self::HttpRequest(_) => StoreErrorKind::Unavailable,
            Self::HttpResponse { status, .. } => StoreError::kind_for_status(*status),
            Self::Json(_) => StoreErrorKind::InvalidResponse,
        }
    }

    /// Convert into a store error about `id`.
    #[must_use]
    pub fn into_store_error(self, id: &str) -> StoreError {
        StoreError::new(self.store_kind())
            .with_backend("Notion")
            .with_block(id)
            .with_source(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_kind() {
        let err = NotionError::HttpResponse {
            status: 404,
            body: "{}".to_owned(),
        };
        assert_eq!(err.store_kind(), StoreErrorKind::NotFound);

        let err = NotionError::HttpResponse {
            status: 429,
            body: String::new(),
        };
        assert_eq!(err.store_kind(), StoreErrorKind::RateLimited);
    }

    #[test]
    fn test_into_store_error() {
        let err = NotionError::HttpResponse {
            status: 401,
            body: "unauthorized".to_owned(),
        }
        .into_store_error("abc");

        assert_eq!(err.kind, StoreErrorKind::PermissionDenied);
        assert_eq!(
            err.to_string(),
            "[Notion] Permission denied: HTTP error: 401 - unauthorized (block: abc)"
        );
    }

    #[test]
    fn test_json_is_invalid_response() {
        let source = serde_json::from_str::<u32>("x").unwrap_err();
        assert_eq!(
            NotionError::Json(source).store_kind(),
            StoreErrorKind::InvalidResponse
        );
    }
}
