//! Expression tree nodes.
//!
//! Every node is an immutable value; building a new expression references
//! its operands instead of mutating them, so subtrees can be shared freely
//! across plans and threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::literal::Literal;

/// Process-unique identity handle for named expressions.
///
/// Plans map these ids to output aliases (`expr_to_alias`), so the key is
/// the *identity* of a named expression, not its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprId(u64);

impl ExprId {
    /// Mint a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ExprId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    NotEq,
    EqualNullSafe,
    Gt,
    Lt,
    GtEq,
    LtEq,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Pow,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

impl BinaryOperator {
    /// Check if this is a comparison operator.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::EqualNullSafe
                | BinaryOperator::Gt
                | BinaryOperator::Lt
                | BinaryOperator::GtEq
                | BinaryOperator::LtEq
        )
    }

    /// Check if this is a logical operator.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::EqualNullSafe => "EQUAL_NULL",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lt => "<",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Pow => "POWER",
            BinaryOperator::BitwiseAnd => "BITAND",
            BinaryOperator::BitwiseOr => "BITOR",
            BinaryOperator::BitwiseXor => "BITXOR",
        };
        write!(f, "{}", s)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Minus,
    Not,
    IsNull,
    IsNotNull,
    IsNaN,
}

/// An aliased expression: `expr AS name`.
///
/// Carries an [`ExprId`] so the execution layer can recover the alias for
/// this exact node via `expr_to_alias`. Equality is structural and ignores
/// the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasExpr {
    pub expr: Box<Expr>,
    pub name: String,
    pub id: ExprId,
}

impl AliasExpr {
    pub fn new(expr: Expr, name: impl Into<String>) -> Self {
        Self {
            expr: Box::new(expr),
            name: name.into(),
            id: ExprId::next(),
        }
    }
}

impl PartialEq for AliasExpr {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr && self.name == other.name
    }
}

/// A name slot with no fixed name yet.
///
/// Projections require every item to have a resolvable output name; an
/// unnamed expression gets wrapped in one of these and the name is decided
/// downstream. Equality ignores the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedAliasExpr {
    pub expr: Box<Expr>,
    pub id: ExprId,
}

impl UnresolvedAliasExpr {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr: Box::new(expr),
            id: ExprId::next(),
        }
    }
}

impl PartialEq for UnresolvedAliasExpr {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

/// Immutable expression tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal scalar value.
    Literal(Literal),
    /// Column reference, stored pre-quoted.
    UnresolvedAttribute { name: String },
    /// `*` or `qualifier.*`, qualifier stored as parsed path segments.
    UnresolvedStar { qualifier: Option<Vec<String>> },
    /// `expr AS name`.
    Alias(AliasExpr),
    /// Expression that needs a name slot but has no fixed name.
    UnresolvedAlias(UnresolvedAliasExpr),
    /// Unary operation.
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },
    /// Binary operation. Operand order is exactly as constructed; the
    /// non-commutative operators are never reordered.
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Build a binary operation node.
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Build a unary operation node.
    pub fn unary(op: UnaryOperator, expr: Expr) -> Expr {
        Expr::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    /// The resolvable output name of this expression, if it has one.
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Expr::Alias(alias) => Some(&alias.name),
            Expr::UnresolvedAttribute { name } => Some(name),
            _ => None,
        }
    }

    /// Whether this expression carries a name slot (fixed or deferred).
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Expr::Alias(_) | Expr::UnresolvedAttribute { .. } | Expr::UnresolvedAlias(_)
        )
    }

    /// The identity handle of this expression, for named wrappers.
    pub fn expr_id(&self) -> Option<ExprId> {
        match self {
            Expr::Alias(alias) => Some(alias.id),
            Expr::UnresolvedAlias(alias) => Some(alias.id),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::UnresolvedAttribute { name } => write!(f, "{}", name),
            Expr::UnresolvedStar { qualifier: None } => write!(f, "*"),
            Expr::UnresolvedStar {
                qualifier: Some(parts),
            } => write!(f, "{}.*", parts.join(".")),
            Expr::Alias(alias) => write!(f, "{} AS {}", alias.expr, alias.name),
            Expr::UnresolvedAlias(alias) => write!(f, "{}", alias.expr),
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Minus => write!(f, "(-{})", expr),
                UnaryOperator::Not => write!(f, "(NOT {})", expr),
                UnaryOperator::IsNull => write!(f, "({} IS NULL)", expr),
                UnaryOperator::IsNotNull => write!(f, "({} IS NOT NULL)", expr),
                UnaryOperator::IsNaN => write!(f, "({} = 'NaN')", expr),
            },
            Expr::BinaryOp { left, op, right } => {
                if matches!(
                    op,
                    BinaryOperator::EqualNullSafe
                        | BinaryOperator::Pow
                        | BinaryOperator::BitwiseAnd
                        | BinaryOperator::BitwiseOr
                        | BinaryOperator::BitwiseXor
                ) {
                    write!(f, "{}({}, {})", op, left, right)
                } else {
                    write!(f, "({} {} {})", left, op, right)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_id_unique() {
        let a = ExprId::next();
        let b = ExprId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_alias_equality_ignores_id() {
        let inner = Expr::UnresolvedAttribute {
            name: "\"A\"".into(),
        };
        let first = AliasExpr::new(inner.clone(), "\"X\"");
        let second = AliasExpr::new(inner, "\"X\"");
        assert_ne!(first.id, second.id);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_name() {
        let attr = Expr::UnresolvedAttribute {
            name: "\"A\"".into(),
        };
        assert_eq!(attr.output_name(), Some("\"A\""));

        let aliased = Expr::Alias(AliasExpr::new(attr.clone(), "\"X\""));
        assert_eq!(aliased.output_name(), Some("\"X\""));

        let unnamed = Expr::unary(UnaryOperator::Not, attr.clone());
        assert_eq!(unnamed.output_name(), None);

        let deferred = Expr::UnresolvedAlias(UnresolvedAliasExpr::new(unnamed));
        assert_eq!(deferred.output_name(), None);
        assert!(deferred.is_named());
    }

    #[test]
    fn test_binary_preserves_operand_order() {
        let left = Expr::UnresolvedAttribute {
            name: "\"A\"".into(),
        };
        let right = Expr::Literal(Literal::Integer(1));
        let sub = Expr::binary(left.clone(), BinaryOperator::Minus, right.clone());
        match sub {
            Expr::BinaryOp {
                left: l,
                op,
                right: r,
            } => {
                assert_eq!(*l, left);
                assert_eq!(op, BinaryOperator::Minus);
                assert_eq!(*r, right);
            }
            other => panic!("expected binary op, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let a = Expr::UnresolvedAttribute {
            name: "\"A\"".into(),
        };
        let expr = Expr::binary(
            a,
            BinaryOperator::Plus,
            Expr::Literal(Literal::Integer(1)),
        );
        assert_eq!(expr.to_string(), "(\"A\" + 1)");
    }
}
