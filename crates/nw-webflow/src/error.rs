//! Error types for Webflow integration.

use nw_compiler::MediaError;

/// Error from Webflow API and media transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum WebflowError {
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

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// The asset creation response lacked a required field.
    #[error("asset response missing {0}")]
    MissingField(&'static str),
}

impl From<WebflowError> for MediaError {
    fn from(err: WebflowError) -> Self {
        match err {
            WebflowError::HttpRequest(e) => Self::Http(e.to_string()),
            WebflowError::HttpResponse { status, body } => Self::HttpResponse { status, body },
            WebflowError::Json(e) => Self::InvalidResponse(e.to_string()),
            WebflowError::MissingField(field) => {
                Self::InvalidResponse(format!("asset response missing {field}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_keeps_status() {
        let err: MediaError = WebflowError::HttpResponse {
            status: 403,
            body: "AccessDenied".to_owned(),
        }
        .into();
        assert!(matches!(err, MediaError::HttpResponse { status: 403, .. }));
        assert_eq!(err.to_string(), "HTTP 403: AccessDenied");
    }

    #[test]
    fn test_missing_field_is_invalid_response() {
        let err: MediaError = WebflowError::MissingField("hostedUrl").into();
        assert_eq!(err.to_string(), "invalid response: asset response missing hostedUrl");
    }
}
