//! Logical plans and their compiled form.
//!
//! A [`LogicalPlan`] describes one relational operation; the
//! [`PlanBuilder`] lowers each operation against its child's compiled form,
//! bottom-up, into a [`CompiledPlan`]: an ordered batch of SQL statements
//! plus the metadata needed to execute and clean up after them.

mod builder;
mod compiled;
mod error;
mod logical;

pub use builder::PlanBuilder;
pub use compiled::{Attribute, CompiledPlan, DataType, Query};
pub use error::{PlanError, PlanResult};
pub use logical::LogicalPlan;
