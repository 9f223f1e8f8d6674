//! CLI error types.

use nw_compiler::ConvertError;
use nw_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Conversion failure already reported in the JSON result.
    #[error("{0}")]
    Reported(String),
}
