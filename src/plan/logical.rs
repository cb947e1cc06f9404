//! Logical query plan representation.
//!
//! Logical plans represent *what* a step does, not the SQL that will run.
//! Children are shared through `Arc` so compiled plans can keep non-owning
//! diagnostic references back into the tree.

use std::fmt;
use std::sync::Arc;

use super::compiled::CompiledPlan;
use crate::expr::Expr;

/// Logical query plan node.
#[derive(Debug, Clone)]
pub enum LogicalPlan {
    /// Reference a named table.
    UnresolvedRelation { name: String },

    /// Project expressions over the child.
    Project {
        project_list: Vec<Expr>,
        child: Arc<LogicalPlan>,
        is_distinct: bool,
    },

    /// Filter the child's rows by a predicate.
    Filter {
        condition: Expr,
        child: Arc<LogicalPlan>,
    },

    /// An already-compiled plan used as a leaf.
    Compiled(CompiledPlan),
}

impl LogicalPlan {
    /// One-line description of this node.
    pub fn describe(&self) -> String {
        match self {
            LogicalPlan::UnresolvedRelation { name } => format!("Relation: {}", name),
            LogicalPlan::Project {
                project_list,
                is_distinct,
                ..
            } => {
                let items: Vec<String> = project_list.iter().map(|e| e.to_string()).collect();
                if *is_distinct {
                    format!("Project (distinct): [{}]", items.join(", "))
                } else {
                    format!("Project: [{}]", items.join(", "))
                }
            }
            LogicalPlan::Filter { condition, .. } => format!("Filter: {}", condition),
            LogicalPlan::Compiled(plan) => {
                format!("Compiled: {} statement(s)", plan.queries.len())
            }
        }
    }

    fn format_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        writeln!(f, "{}{}", pad, self.describe())?;
        match self {
            LogicalPlan::Project { child, .. } | LogicalPlan::Filter { child, .. } => {
                child.format_indent(f, indent + 1)
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_indent(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::col;

    #[test]
    fn test_display_tree() {
        let scan = Arc::new(LogicalPlan::UnresolvedRelation {
            name: "users".into(),
        });
        let filter = Arc::new(LogicalPlan::Filter {
            condition: col("age").unwrap().gt(21i64).into_expression(),
            child: scan,
        });
        let project = LogicalPlan::Project {
            project_list: vec![col("name").unwrap().into_expression()],
            child: filter,
            is_distinct: false,
        };

        let rendered = project.to_string();
        assert!(rendered.contains("Project"));
        assert!(rendered.contains("Filter"));
        assert!(rendered.contains("Relation: users"));
    }
}
