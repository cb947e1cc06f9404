//! Rendering errors.

use thiserror::Error;

use super::ident::NameParseError;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// SQL rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot render expression in this position: {0}")]
    UnsupportedExpression(String),

    #[error("unrecognized copy option: {0}")]
    UnrecognizedCopyOption(String),

    #[error(transparent)]
    NameParse(#[from] NameParseError),
}
