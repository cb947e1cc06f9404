//! SQL text generation.
//!
//! This module renders expressions and relational operations into concrete
//! SQL syntax: identifier quoting, statement templates, and the resolver
//! that lowers a logical plan tree into a compiled statement batch.

mod analyzer;
mod error;
mod generator;
mod ident;

pub use analyzer::{expression_sql, projection_sql, Resolver};
pub use error::{RenderError, RenderResult};
pub use generator::{SqlGenerator, COPY_OPTION_KEYS};
pub use ident::{parse_attribute_path, quote_name, NameParseError};
