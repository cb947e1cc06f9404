//! Column construction errors.

use thiserror::Error;

use crate::render::NameParseError;

/// Result type for column operations.
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Column construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("a column takes only a name string or an expression")]
    Construction,

    #[error(transparent)]
    NameParse(#[from] NameParseError),
}
