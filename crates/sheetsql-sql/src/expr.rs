//! SQL expressions.

use crate::ColumnName;

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference
    Column(ColumnName),
    /// A value wrapped in single quotes
    Quoted(String),
    /// A value written verbatim (numbers and anything else unquoted)
    Raw(String),
    /// Binary operation (e.g., a = b, a AND b)
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    And,
}

impl BinOp {
    /// The operator text including its surrounding whitespace.
    ///
    /// Predicates are joined with two spaces on each side of `AND`.
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Eq => " = ",
            BinOp::And => "  AND  ",
        }
    }
}

// Convenience constructors
impl Expr {
    pub fn column(name: impl Into<ColumnName>) -> Self {
        Expr::Column(name.into())
    }

    pub fn quoted(s: impl Into<String>) -> Self {
        Expr::Quoted(s.into())
    }

    pub fn raw(s: impl Into<String>) -> Self {
        Expr::Raw(s.into())
    }

    /// A value, quoted or verbatim depending on `quote`.
    pub fn value(s: impl Into<String>, quote: bool) -> Self {
        if quote {
            Expr::Quoted(s.into())
        } else {
            Expr::Raw(s.into())
        }
    }

    /// Create an equality expression: self = other
    pub fn eq(self, other: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(self),
            op: BinOp::Eq,
            right: Box::new(other),
        }
    }

    /// Create an AND expression: self AND other
    pub fn and(self, other: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(self),
            op: BinOp::And,
            right: Box::new(other),
        }
    }

    /// Fold predicates into a left-nested AND chain.
    ///
    /// Returns `None` for an empty iterator, so callers omit the WHERE
    /// clause entirely instead of rendering a dangling keyword.
    pub fn all(predicates: impl IntoIterator<Item = Expr>) -> Option<Self> {
        predicates.into_iter().reduce(Expr::and)
    }
}
