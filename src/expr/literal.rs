//! Literal scalar values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal value.
///
/// This is the closed set of scalar types the fluent API coerces from; any
/// value fed to a column operation that is not already a column or an
/// expression must convert into one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Semi-structured value, rendered through `PARSE_JSON`.
    Json(Value),
    Timestamp(DateTime<Utc>),
}

impl From<()> for Literal {
    fn from(_: ()) -> Self {
        Literal::Null
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(v as i64)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl From<Value> for Literal {
    fn from(v: Value) -> Self {
        Literal::Json(v)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(v: DateTime<Utc>) -> Self {
        Literal::Timestamp(v)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Json(v) => write!(f, "{}", v),
            Literal::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scalars() {
        assert_eq!(Literal::from(()), Literal::Null);
        assert_eq!(Literal::from(true), Literal::Boolean(true));
        assert_eq!(Literal::from(42i32), Literal::Integer(42));
        assert_eq!(Literal::from(42i64), Literal::Integer(42));
        assert_eq!(Literal::from(1.5), Literal::Float(1.5));
        assert_eq!(Literal::from("hi"), Literal::String("hi".into()));
        assert_eq!(
            Literal::from(String::from("hi")),
            Literal::String("hi".into())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::Null.to_string(), "NULL");
        assert_eq!(Literal::Boolean(false).to_string(), "FALSE");
        assert_eq!(Literal::String("a".into()).to_string(), "'a'");
    }
}
