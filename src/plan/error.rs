//! Plan compilation errors.

use thiserror::Error;

use crate::render::RenderError;

/// Result type for plan compilation.
pub type PlanResult<T> = Result<T, PlanError>;

/// Plan compilation errors.
///
/// Compilation is pure and deterministic: a failing render function is
/// reported to the caller unchanged, with nothing to roll back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("a compiled plan needs at least one statement")]
    EmptyBatch,

    #[error(
        "non-SELECT statement {0:?} has no query-id placeholder to reference; \
         build it with PlanBuilder::query or query_with_attributes"
    )]
    MissingPlaceholder(String),
}
