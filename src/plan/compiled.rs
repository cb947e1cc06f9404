//! Compiled plans: ordered SQL statement batches plus execution metadata.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::error::{PlanError, PlanResult};
use super::logical::LogicalPlan;
use crate::expr::ExprId;
use crate::session::Session;

/// One SQL statement with an optional query-id placeholder.
///
/// The placeholder is a marker the execution layer substitutes with a live
/// query id at run time; the compiler never resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub sql: String,
    pub placeholder: Option<String>,
}

impl Query {
    /// A statement with no placeholder.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            placeholder: None,
        }
    }

    /// A statement with a freshly minted query-id placeholder, for
    /// statements whose result a later statement may reference.
    pub fn with_placeholder(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            placeholder: Some(format!("query_id_place_holder_{}", Ulid::new())),
        }
    }
}

/// SQL data types for output attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Integer,
    Float,
    Boolean,
    Json,
    Timestamp,
}

impl DataType {
    /// The SQL spelling of this type.
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::Text => "VARCHAR",
            DataType::Integer => "BIGINT",
            DataType::Float => "DOUBLE",
            DataType::Boolean => "BOOLEAN",
            DataType::Json => "VARIANT",
            DataType::Timestamp => "TIMESTAMP_NTZ",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

/// A known output attribute of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// An ordered batch of SQL statements plus metadata needed to execute and
/// clean up after them.
///
/// Invariants: `queries` is never empty and its last statement defines the
/// plan's output; `schema_query` resolves the output schema without running
/// `queries`; `post_actions` must be executed after the main statements
/// regardless of their outcome.
#[derive(Debug, Clone)]
pub struct CompiledPlan {
    /// Statements to execute in order. Only the last one's result matters
    /// for output rows, but earlier ones must run for their side effects.
    pub queries: Vec<Query>,
    /// Cheap, side-effect-free statement resolving the output schema.
    pub schema_query: String,
    /// Cleanup statements, run after the main queries no matter what.
    pub post_actions: Vec<Query>,
    /// Recovers human-readable output names for renamed expressions.
    pub expr_to_alias: HashMap<ExprId, String>,
    /// Output attributes, when known ahead of execution. Required for
    /// plans whose last statement is not a SELECT, so that wrapping can
    /// derive a schema-description statement.
    pub attributes: Vec<Attribute>,
    /// Execution context this plan belongs to.
    pub session: Arc<Session>,
    source_plan: Option<Weak<LogicalPlan>>,
}

impl CompiledPlan {
    /// Create a plan from its statement batch.
    ///
    /// Errors with [`PlanError::EmptyBatch`] if `queries` is empty.
    pub fn new(
        queries: Vec<Query>,
        schema_query: impl Into<String>,
        session: Arc<Session>,
    ) -> PlanResult<Self> {
        if queries.is_empty() {
            return Err(PlanError::EmptyBatch);
        }
        Ok(Self::from_parts(queries, schema_query.into(), session))
    }

    /// Internal constructor for batches that are non-empty by construction.
    pub(crate) fn from_parts(
        queries: Vec<Query>,
        schema_query: String,
        session: Arc<Session>,
    ) -> Self {
        debug_assert!(!queries.is_empty());
        Self {
            queries,
            schema_query,
            post_actions: Vec::new(),
            expr_to_alias: HashMap::new(),
            attributes: Vec::new(),
            session,
            source_plan: None,
        }
    }

    /// Attach cleanup statements.
    pub fn with_post_actions(mut self, post_actions: Vec<Query>) -> Self {
        self.post_actions = post_actions;
        self
    }

    /// Attach the expression-to-alias map.
    pub fn with_expr_to_alias(mut self, expr_to_alias: HashMap<ExprId, String>) -> Self {
        self.expr_to_alias = expr_to_alias;
        self
    }

    /// Attach known output attributes.
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Record the logical plan this was compiled from.
    ///
    /// The reference is non-owning and purely diagnostic; compilation of
    /// later steps never consults it.
    pub fn with_source_plan(mut self, source_plan: Option<&Arc<LogicalPlan>>) -> Self {
        self.source_plan = source_plan.map(Arc::downgrade);
        self
    }

    /// The statement whose result defines this plan's output.
    pub fn last_query(&self) -> &Query {
        self.queries.last().expect("queries is never empty")
    }

    /// The originating logical plan, if it is still alive.
    pub fn source_plan(&self) -> Option<Arc<LogicalPlan>> {
        self.source_plan.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn source_plan_ref(&self) -> Option<&Weak<LogicalPlan>> {
        self.source_plan.as_ref()
    }

    pub(crate) fn set_source_plan_weak(&mut self, source_plan: Option<Weak<LogicalPlan>>) {
        self.source_plan = source_plan;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Arc<Session> {
        Arc::new(Session::new())
    }

    #[test]
    fn test_last_query() {
        let plan = CompiledPlan::new(
            vec![Query::new("CREATE TABLE T (A INT)"), Query::new("SELECT * FROM (T)")],
            "SELECT * FROM (T)",
            session(),
        )
        .unwrap();
        assert_eq!(plan.last_query().sql, "SELECT * FROM (T)");
    }

    #[test]
    fn test_empty_queries_rejected() {
        let result = CompiledPlan::new(Vec::new(), "SELECT 1", session());
        assert!(matches!(result, Err(PlanError::EmptyBatch)));
    }

    #[test]
    fn test_placeholder_is_unique() {
        let a = Query::with_placeholder("COPY INTO T");
        let b = Query::with_placeholder("COPY INTO T");
        assert_ne!(a.placeholder, b.placeholder);
        assert!(a.placeholder.unwrap().starts_with("query_id_place_holder_"));
    }

    #[test]
    fn test_source_plan_is_non_owning() {
        let logical = Arc::new(LogicalPlan::UnresolvedRelation { name: "T".into() });
        let plan = CompiledPlan::new(vec![Query::new("SELECT 1")], "SELECT 1", session())
            .unwrap()
            .with_source_plan(Some(&logical));

        assert!(plan.source_plan().is_some());
        drop(logical);
        // The back-reference never keeps the logical plan alive.
        assert!(plan.source_plan().is_none());
    }
}
