//! The plan builder: lowers relational operations onto compiled children.

use std::borrow::Cow;
use std::sync::Arc;

use super::compiled::{Attribute, CompiledPlan, Query};
use super::error::{PlanError, PlanResult};
use super::logical::LogicalPlan;
use crate::render::SqlGenerator;
use crate::session::Session;

fn starts_with_select(sql: &str) -> bool {
    sql.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

/// Stateless compiler from relational operations to compiled plans.
///
/// Each call composes one more statement over a child's batch; the child is
/// never mutated.
pub struct PlanBuilder {
    session: Arc<Session>,
    generator: SqlGenerator,
}

impl PlanBuilder {
    /// Create a builder bound to a session.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            generator: SqlGenerator::new(),
        }
    }

    /// The session this builder stamps onto compiled plans.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The statement renderer used for synthetic statements.
    pub fn generator(&self) -> &SqlGenerator {
        &self.generator
    }

    /// A single-statement plan from raw SQL.
    ///
    /// This is the entry point for statements that are not composable
    /// SELECTs (bulk loads, DDL). The statement is minted with a query-id
    /// placeholder so a later step can reference its result; callers should
    /// attach known output attributes so that wrapping can derive a schema
    /// statement.
    pub fn query(
        &self,
        sql: impl Into<String>,
        source_plan: Option<&Arc<LogicalPlan>>,
    ) -> CompiledPlan {
        let sql = sql.into();
        CompiledPlan::from_parts(
            vec![Query::with_placeholder(sql.clone())],
            sql,
            self.session.clone(),
        )
        .with_source_plan(source_plan)
    }

    /// A single-statement plan from raw SQL with known output attributes.
    ///
    /// The schema query becomes a schema-description statement over the
    /// attributes, so the schema probe never has to execute the statement
    /// itself.
    pub fn query_with_attributes(
        &self,
        sql: impl Into<String>,
        attributes: Vec<Attribute>,
        source_plan: Option<&Arc<LogicalPlan>>,
    ) -> CompiledPlan {
        let schema_query = self.generator.schema_value_statement(&attributes);
        CompiledPlan::from_parts(
            vec![Query::with_placeholder(sql.into())],
            schema_query,
            self.session.clone(),
        )
        .with_attributes(attributes)
        .with_source_plan(source_plan)
    }

    /// A plan selecting everything from a named table.
    pub fn table(&self, name: &str) -> CompiledPlan {
        self.query(self.generator.project_statement(&[], name, false), None)
    }

    /// Compose one rendered statement over a child plan.
    ///
    /// The child's last statement is replaced by `sql_generator`'s output;
    /// earlier statements, post-actions and the alias map carry forward
    /// unchanged. The schema query is derived from the *original* child
    /// (not the wrapped one) unless an override is given, so wrapping
    /// artifacts never leak into the schema probe.
    pub fn build<F>(
        &self,
        sql_generator: F,
        child: &CompiledPlan,
        source_plan: Option<&Arc<LogicalPlan>>,
        schema_query: Option<String>,
    ) -> PlanResult<CompiledPlan>
    where
        F: Fn(&str) -> PlanResult<String>,
    {
        let select_child = self.wrap_if_not_select(child)?;

        let mut queries: Vec<Query> =
            select_child.queries[..select_child.queries.len() - 1].to_vec();
        queries.push(Query::new(sql_generator(&select_child.last_query().sql)?));

        let schema_query = match schema_query {
            Some(query) => query,
            None => sql_generator(&child.schema_query)?,
        };

        Ok(
            CompiledPlan::from_parts(queries, schema_query, self.session.clone())
                .with_post_actions(select_child.post_actions.clone())
                .with_expr_to_alias(select_child.expr_to_alias.clone())
                .with_source_plan(source_plan),
        )
    }

    /// Project `project_list` over the child's output.
    pub fn project(
        &self,
        project_list: &[String],
        child: &CompiledPlan,
        source_plan: Option<&Arc<LogicalPlan>>,
        is_distinct: bool,
    ) -> PlanResult<CompiledPlan> {
        self.build(
            |sql| {
                Ok(self
                    .generator
                    .project_statement(project_list, sql, is_distinct))
            },
            child,
            source_plan,
            None,
        )
    }

    /// Filter the child's output by a rendered predicate.
    pub fn filter(
        &self,
        condition: &str,
        child: &CompiledPlan,
        source_plan: Option<&Arc<LogicalPlan>>,
    ) -> PlanResult<CompiledPlan> {
        self.build(
            |sql| Ok(self.generator.filter_statement(condition, sql)),
            child,
            source_plan,
            None,
        )
    }

    /// Make a plan's last statement composable as a subselect.
    ///
    /// A plan already ending in a SELECT is used as-is. Otherwise one
    /// synthetic result-scan statement referencing the prior statement's
    /// placeholder id is appended, and the schema query becomes a literal
    /// schema-description statement over the plan's known attributes.
    ///
    /// The placeholder is part of the child's identity, minted when the
    /// child was constructed; a non-SELECT statement without one cannot be
    /// referenced and is rejected, so that recompiling against the same
    /// child always yields byte-identical statements.
    fn wrap_if_not_select<'a>(&self, plan: &'a CompiledPlan) -> PlanResult<Cow<'a, CompiledPlan>> {
        if starts_with_select(&plan.last_query().sql) {
            return Ok(Cow::Borrowed(plan));
        }

        let last = plan.last_query();
        let placeholder = match &last.placeholder {
            Some(placeholder) => placeholder.clone(),
            None => return Err(PlanError::MissingPlaceholder(last.sql.clone())),
        };

        let mut queries = plan.queries.clone();
        queries.push(Query::new(
            self.generator.result_scan_statement(&placeholder),
        ));

        let mut wrapped = CompiledPlan::from_parts(
            queries,
            self.generator.schema_value_statement(&plan.attributes),
            self.session.clone(),
        )
        .with_post_actions(plan.post_actions.clone())
        .with_expr_to_alias(plan.expr_to_alias.clone())
        .with_attributes(plan.attributes.clone());
        wrapped.set_source_plan_weak(plan.source_plan_ref().cloned());

        Ok(Cow::Owned(wrapped))
    }
}
