//! Immutable expression AST.
//!
//! Expressions describe scalar and boolean computations as trees. They are
//! never evaluated here; the render module lowers them to SQL text and the
//! execution layer runs the result.

mod expr;
mod literal;

pub use expr::{AliasExpr, BinaryOperator, Expr, ExprId, UnaryOperator, UnresolvedAliasExpr};
pub use literal::Literal;
