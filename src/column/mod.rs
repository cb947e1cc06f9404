//! User-facing column values.
//!
//! A [`Column`] wraps one expression and exposes the fluent construction
//! API: comparisons, arithmetic, boolean logic and aliasing, each returning
//! a new column over a new expression node.

mod column;
mod error;

pub use column::{col, lit, Column, IntoExpr};
pub use error::{ColumnError, ColumnResult};
