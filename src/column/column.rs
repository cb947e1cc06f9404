//! The fluent column value and its coercion rules.

use std::fmt;
use std::ops;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::{ColumnError, ColumnResult};
use crate::expr::{
    AliasExpr, BinaryOperator, Expr, Literal, UnaryOperator, UnresolvedAliasExpr,
};
use crate::render::{parse_attribute_path, quote_name};

/// Conversion into an expression operand.
///
/// This is a closed trait: it is implemented for columns, expressions, and
/// the supported literal scalar types, and nothing else. It replaces
/// runtime type dispatch with a compile-time coercion rule.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Column {
    fn into_expr(self) -> Expr {
        self.expr
    }
}

impl IntoExpr for &Column {
    fn into_expr(self) -> Expr {
        self.expr.clone()
    }
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Expr {
        self.clone()
    }
}

macro_rules! impl_into_expr_for_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Literal(Literal::from(self))
                }
            }
        )*
    };
}

impl_into_expr_for_literal!(
    Literal,
    (),
    bool,
    i32,
    i64,
    f64,
    &str,
    String,
    Value,
    DateTime<Utc>,
);

/// An immutable value wrapper over one expression.
///
/// Every operation returns a new `Column` holding a new expression that
/// references the old one; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    expr: Expr,
}

/// Create a column referring to a name: an attribute, `*`, or `qualifier.*`.
pub fn col(name: &str) -> ColumnResult<Column> {
    Column::from_name(name)
}

/// Create a column holding a literal value.
pub fn lit(value: impl Into<Literal>) -> Column {
    Column::from_expr(Expr::Literal(value.into()))
}

impl Column {
    /// Build a column from a name string.
    ///
    /// `"*"` becomes a bare star, a name ending in `".*"` becomes a
    /// qualified star, and anything else a quoted attribute reference.
    pub fn from_name(name: &str) -> ColumnResult<Column> {
        if name.is_empty() {
            return Err(ColumnError::Construction);
        }
        let expr = if name == "*" {
            Expr::UnresolvedStar { qualifier: None }
        } else if let Some(prefix) = name.strip_suffix(".*") {
            let parts = parse_attribute_path(prefix)?;
            Expr::UnresolvedStar {
                qualifier: Some(parts),
            }
        } else {
            Expr::UnresolvedAttribute {
                name: quote_name(name),
            }
        };
        Ok(Column { expr })
    }

    /// Build a column from an existing expression.
    pub fn from_expr(expr: Expr) -> Column {
        Column { expr }
    }

    /// The wrapped expression.
    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    /// Consume the column, yielding its expression.
    pub fn into_expression(self) -> Expr {
        self.expr
    }

    fn with_expr(expr: Expr) -> Column {
        Column { expr }
    }

    fn binary(&self, op: BinaryOperator, other: impl IntoExpr) -> Column {
        Column::with_expr(Expr::binary(self.expr.clone(), op, other.into_expr()))
    }

    fn unary(&self, op: UnaryOperator) -> Column {
        Column::with_expr(Expr::unary(op, self.expr.clone()))
    }

    /// Equality predicate. Builds an expression node; host-level equality
    /// of columns stays with `PartialEq`.
    pub fn equal_to(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Eq, other)
    }

    /// Inequality predicate.
    pub fn not_equal(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::NotEq, other)
    }

    /// Greater-than predicate.
    pub fn gt(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Gt, other)
    }

    /// Less-than predicate.
    pub fn lt(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Lt, other)
    }

    /// Greater-than-or-equal predicate.
    pub fn gt_eq(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::GtEq, other)
    }

    /// Less-than-or-equal predicate.
    pub fn lt_eq(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::LtEq, other)
    }

    /// Null-safe equality predicate.
    pub fn equal_null(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::EqualNullSafe, other)
    }

    /// NaN test.
    pub fn equal_nan(&self) -> Column {
        self.unary(UnaryOperator::IsNaN)
    }

    /// IS NULL test.
    pub fn is_null(&self) -> Column {
        self.unary(UnaryOperator::IsNull)
    }

    /// IS NOT NULL test.
    pub fn is_not_null(&self) -> Column {
        self.unary(UnaryOperator::IsNotNull)
    }

    /// Boolean AND.
    pub fn and(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::And, other)
    }

    /// Boolean OR.
    pub fn or(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Or, other)
    }

    /// Boolean NOT.
    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Column {
        self.unary(UnaryOperator::Not)
    }

    /// Arithmetic negation.
    #[allow(clippy::should_implement_trait)]
    pub fn neg(&self) -> Column {
        self.unary(UnaryOperator::Minus)
    }

    /// Addition. The reflected form is spelled `lit(v).add(&c)`.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Plus, other)
    }

    /// Subtraction. Operand order is preserved exactly.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Minus, other)
    }

    /// Multiplication.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Multiply, other)
    }

    /// Division.
    #[allow(clippy::should_implement_trait)]
    pub fn div(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Divide, other)
    }

    /// Remainder.
    #[allow(clippy::should_implement_trait)]
    pub fn rem(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Modulo, other)
    }

    /// Exponentiation.
    pub fn pow(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::Pow, other)
    }

    /// Bitwise AND.
    pub fn bitand(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::BitwiseAnd, other)
    }

    /// Bitwise OR.
    pub fn bitor(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::BitwiseOr, other)
    }

    /// Bitwise XOR.
    pub fn bitxor(&self, other: impl IntoExpr) -> Column {
        self.binary(BinaryOperator::BitwiseXor, other)
    }

    /// Returns a new renamed column.
    pub fn name(&self, alias: &str) -> Column {
        Column::with_expr(Expr::Alias(AliasExpr::new(
            self.expr.clone(),
            quote_name(alias),
        )))
    }

    /// Returns a new renamed column. Alias of [`Column::name`].
    pub fn alias(&self, alias: &str) -> Column {
        self.name(alias)
    }

    /// Returns a new renamed column. Alias of [`Column::name`].
    pub fn as_(&self, alias: &str) -> Column {
        self.name(alias)
    }

    /// The output name of this column, if it has one.
    pub fn get_name(&self) -> Option<&str> {
        self.expr.output_name()
    }

    /// The expression with a guaranteed name slot.
    ///
    /// Projection steps require every item to be nameable; expressions
    /// without a name get a deferred alias wrapper.
    pub fn named(&self) -> Expr {
        if self.expr.is_named() {
            self.expr.clone()
        } else {
            Expr::UnresolvedAlias(UnresolvedAliasExpr::new(self.expr.clone()))
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column[{}]", self.expr)
    }
}

// Operator sugar over the named methods. `&` and `|` follow the fluent
// API's boolean usage and build logical AND/OR.

macro_rules! impl_column_binop {
    ($($trait:ident :: $method:ident => $named:ident),* $(,)?) => {
        $(
            impl<T: IntoExpr> ops::$trait<T> for Column {
                type Output = Column;
                fn $method(self, rhs: T) -> Column {
                    Column::$named(&self, rhs)
                }
            }

            impl<T: IntoExpr> ops::$trait<T> for &Column {
                type Output = Column;
                fn $method(self, rhs: T) -> Column {
                    Column::$named(self, rhs)
                }
            }
        )*
    };
}

impl_column_binop!(
    Add::add => add,
    Sub::sub => sub,
    Mul::mul => mul,
    Div::div => div,
    Rem::rem => rem,
    BitAnd::bitand => and,
    BitOr::bitor => or,
);

impl ops::Neg for Column {
    type Output = Column;
    fn neg(self) -> Column {
        Column::neg(&self)
    }
}

impl ops::Neg for &Column {
    type Output = Column;
    fn neg(self) -> Column {
        Column::neg(self)
    }
}

impl ops::Not for Column {
    type Output = Column;
    fn not(self) -> Column {
        Column::not(&self)
    }
}

impl ops::Not for &Column {
    type Output = Column;
    fn not(self) -> Column {
        Column::not(self)
    }
}
