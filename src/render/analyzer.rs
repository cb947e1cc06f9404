//! Expression-to-SQL lowering and the logical-plan resolver.

use std::sync::Arc;

use super::error::{RenderError, RenderResult};
use super::ident::quote_name;
use crate::expr::{BinaryOperator, Expr, Literal, UnaryOperator};
use crate::plan::{CompiledPlan, LogicalPlan, PlanBuilder, PlanResult};
use crate::session::Session;

fn literal_sql(literal: &Literal) -> String {
    match literal {
        Literal::Null => "NULL".to_string(),
        Literal::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Literal::Integer(n) => n.to_string(),
        Literal::Float(x) => {
            if x.is_nan() {
                "'NaN'::FLOAT".to_string()
            } else if x.is_infinite() {
                if *x > 0.0 {
                    "'inf'::FLOAT".to_string()
                } else {
                    "'-inf'::FLOAT".to_string()
                }
            } else {
                format!("{:?}", x)
            }
        }
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::Json(v) => format!("PARSE_JSON('{}')", v.to_string().replace('\'', "''")),
        Literal::Timestamp(ts) => {
            format!("'{}'::TIMESTAMP_NTZ", ts.format("%Y-%m-%d %H:%M:%S%.f"))
        }
    }
}

/// Render an expression in scalar or predicate position.
///
/// Stars and aliases are projection-only and rejected here.
pub fn expression_sql(expr: &Expr) -> RenderResult<String> {
    match expr {
        Expr::Literal(literal) => Ok(literal_sql(literal)),
        Expr::UnresolvedAttribute { name } => Ok(name.clone()),
        Expr::UnresolvedStar { .. } | Expr::Alias(_) | Expr::UnresolvedAlias(_) => {
            Err(RenderError::UnsupportedExpression(expr.to_string()))
        }
        Expr::UnaryOp { op, expr } => {
            let inner = expression_sql(expr)?;
            Ok(match op {
                UnaryOperator::Minus => format!("(-{})", inner),
                UnaryOperator::Not => format!("(NOT {})", inner),
                UnaryOperator::IsNull => format!("({} IS NULL)", inner),
                UnaryOperator::IsNotNull => format!("({} IS NOT NULL)", inner),
                UnaryOperator::IsNaN => format!("({} = 'NaN')", inner),
            })
        }
        Expr::BinaryOp { left, op, right } => {
            let left = expression_sql(left)?;
            let right = expression_sql(right)?;
            Ok(match op {
                BinaryOperator::EqualNullSafe => format!("EQUAL_NULL({}, {})", left, right),
                BinaryOperator::Pow => format!("POWER({}, {})", left, right),
                BinaryOperator::BitwiseAnd => format!("BITAND({}, {})", left, right),
                BinaryOperator::BitwiseOr => format!("BITOR({}, {})", left, right),
                BinaryOperator::BitwiseXor => format!("BITXOR({}, {})", left, right),
                _ => format!("({} {} {})", left, op, right),
            })
        }
    }
}

/// Render an expression in projection position.
///
/// Allows stars and aliases at the top level; everything else falls back
/// to [`expression_sql`].
pub fn projection_sql(expr: &Expr) -> RenderResult<String> {
    match expr {
        Expr::UnresolvedStar { qualifier: None } => Ok("*".to_string()),
        Expr::UnresolvedStar {
            qualifier: Some(parts),
        } => {
            let path: Vec<String> = parts.iter().map(|p| quote_name(p)).collect();
            Ok(format!("{}.*", path.join(".")))
        }
        Expr::Alias(alias) => {
            let inner = expression_sql(&alias.expr)?;
            Ok(format!("{} AS {}", inner, alias.name))
        }
        // A deferred name slot renders as its inner expression; the name
        // is decided downstream.
        Expr::UnresolvedAlias(alias) => expression_sql(&alias.expr),
        _ => expression_sql(expr),
    }
}

/// Lowers a logical plan tree into a compiled plan, bottom-up, one builder
/// step per relational operator.
pub struct Resolver {
    builder: PlanBuilder,
}

impl Resolver {
    /// Create a resolver bound to a session.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            builder: PlanBuilder::new(session),
        }
    }

    /// The underlying plan builder.
    pub fn builder(&self) -> &PlanBuilder {
        &self.builder
    }

    /// Compile a logical plan tree.
    pub fn resolve(&self, plan: &Arc<LogicalPlan>) -> PlanResult<CompiledPlan> {
        match plan.as_ref() {
            LogicalPlan::UnresolvedRelation { name } => Ok(self.builder.table(name)),
            LogicalPlan::Project {
                project_list,
                child,
                is_distinct,
            } => {
                let compiled_child = self.resolve(child)?;
                let items = project_list
                    .iter()
                    .map(projection_sql)
                    .collect::<RenderResult<Vec<String>>>()?;
                self.builder
                    .project(&items, &compiled_child, Some(plan), *is_distinct)
            }
            LogicalPlan::Filter { condition, child } => {
                let compiled_child = self.resolve(child)?;
                let condition = expression_sql(condition)?;
                self.builder.filter(&condition, &compiled_child, Some(plan))
            }
            LogicalPlan::Compiled(compiled) => Ok(compiled.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{col, lit};

    #[test]
    fn test_literal_rendering() {
        assert_eq!(literal_sql(&Literal::Null), "NULL");
        assert_eq!(literal_sql(&Literal::Boolean(true)), "TRUE");
        assert_eq!(literal_sql(&Literal::Integer(-3)), "-3");
        assert_eq!(literal_sql(&Literal::Float(1.5)), "1.5");
        assert_eq!(literal_sql(&Literal::Float(2.0)), "2.0");
        assert_eq!(literal_sql(&Literal::Float(f64::NAN)), "'NaN'::FLOAT");
        assert_eq!(
            literal_sql(&Literal::String("it's".into())),
            "'it''s'"
        );
        assert_eq!(
            literal_sql(&Literal::Json(serde_json::json!({"a": 1}))),
            "PARSE_JSON('{\"a\":1}')"
        );
    }

    #[test]
    fn test_expression_sql() {
        let predicate = col("age").unwrap().gt(21i64).and(col("name").unwrap().is_not_null());
        assert_eq!(
            expression_sql(predicate.expression()).unwrap(),
            "((\"AGE\" > 21) AND (\"NAME\" IS NOT NULL))"
        );

        let arithmetic = col("a").unwrap().pow(2i64).add(lit(1i64));
        assert_eq!(
            expression_sql(arithmetic.expression()).unwrap(),
            "(POWER(\"A\", 2) + 1)"
        );
    }

    #[test]
    fn test_star_rejected_in_scalar_position() {
        let star = col("*").unwrap();
        assert!(matches!(
            expression_sql(star.expression()),
            Err(RenderError::UnsupportedExpression(_))
        ));
        let nested = col("a").unwrap().add(star);
        assert!(expression_sql(nested.expression()).is_err());
    }

    #[test]
    fn test_projection_sql() {
        assert_eq!(projection_sql(col("*").unwrap().expression()).unwrap(), "*");
        assert_eq!(
            projection_sql(col("t.*").unwrap().expression()).unwrap(),
            "\"T\".*"
        );
        assert_eq!(
            projection_sql(col("a").unwrap().add(1i64).name("b").expression()).unwrap(),
            "(\"A\" + 1) AS \"B\""
        );
        // A deferred name slot renders as its inner expression.
        let unnamed = col("a").unwrap().add(1i64);
        assert_eq!(projection_sql(&unnamed.named()).unwrap(), "(\"A\" + 1)");
    }

    #[test]
    fn test_resolve_plan_tree() {
        let resolver = Resolver::new(Arc::new(Session::new()));

        let scan = Arc::new(LogicalPlan::UnresolvedRelation { name: "T".into() });
        let filter = Arc::new(LogicalPlan::Filter {
            condition: col("a").unwrap().gt(1i64).into_expression(),
            child: scan,
        });
        let project = Arc::new(LogicalPlan::Project {
            project_list: vec![col("a").unwrap().name("x").into_expression()],
            child: filter,
            is_distinct: false,
        });

        let compiled = resolver.resolve(&project).unwrap();
        assert_eq!(compiled.queries.len(), 1);
        assert_eq!(
            compiled.last_query().sql,
            "SELECT \"A\" AS \"X\" FROM (SELECT * FROM (SELECT * FROM (T)) WHERE (\"A\" > 1))"
        );
        assert_eq!(compiled.schema_query, compiled.last_query().sql);
        // The diagnostic back-reference points at the project node.
        assert!(compiled.source_plan().is_some());
    }

    #[test]
    fn test_resolve_compiled_leaf() {
        let resolver = Resolver::new(Arc::new(Session::new()));
        let base = resolver.builder().table("T");
        let leaf = Arc::new(LogicalPlan::Compiled(base.clone()));
        let filter = Arc::new(LogicalPlan::Filter {
            condition: col("a").unwrap().is_null().into_expression(),
            child: leaf,
        });

        let compiled = resolver.resolve(&filter).unwrap();
        assert_eq!(
            compiled.last_query().sql,
            "SELECT * FROM (SELECT * FROM (T)) WHERE (\"A\" IS NULL)"
        );
    }
}
