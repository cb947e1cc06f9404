//! sqlplan - a fluent query-expression compiler
//!
//! This crate turns a value-oriented expression API into an immutable AST,
//! then lowers a tree of relational operations into an ordered batch of
//! executable SQL statements. Statement execution, placeholder resolution
//! and result decoding belong to a separate execution layer; everything in
//! here is pure, synchronous value transformation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sqlplan::{col, LogicalPlan, Resolver, Session};
//!
//! let resolver = Resolver::new(Arc::new(Session::new()));
//!
//! let scan = Arc::new(LogicalPlan::UnresolvedRelation { name: "users".into() });
//! let adults = Arc::new(LogicalPlan::Filter {
//!     condition: col("age")?.gt(21i64).into_expression(),
//!     child: scan,
//! });
//!
//! let compiled = resolver.resolve(&adults)?;
//! assert_eq!(
//!     compiled.last_query().sql,
//!     "SELECT * FROM (SELECT * FROM (users)) WHERE (\"AGE\" > 21)"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod column;
pub mod expr;
pub mod plan;
pub mod render;
pub mod session;

pub use column::{col, lit, Column, ColumnError, IntoExpr};
pub use expr::{BinaryOperator, Expr, ExprId, Literal, UnaryOperator};
pub use plan::{Attribute, CompiledPlan, DataType, LogicalPlan, PlanBuilder, PlanError, Query};
pub use render::{NameParseError, RenderError, Resolver, SqlGenerator};
pub use session::Session;
