//! Render SQL AST to string.
//!
//! Every statement renders to one line terminated by `;`. Lists are joined
//! with a separator as they are written, and an absent WHERE predicate
//! omits the keyword entirely.

use std::fmt;

use crate::Lit;
use crate::expr::Expr;
use crate::stmt::*;

/// Wrapper for rendering a value via Display.
pub struct Fmt<'a, T: Render + ?Sized>(pub &'a T);

impl<T: Render + ?Sized> fmt::Display for Fmt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

// ============================================================================
// Render implementations
// ============================================================================

/// Trait for types that can be rendered to SQL.
pub trait Render {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Write `items` separated by `sep`.
fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_where(f: &mut fmt::Formatter<'_>, where_: &Option<Expr>) -> fmt::Result {
    if let Some(where_) = where_ {
        write!(f, " WHERE {}", Fmt(where_))?;
    }
    Ok(())
}

impl Render for Expr {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{name}"),
            Expr::Quoted(s) => write!(f, "{}", Lit(s)),
            Expr::Raw(s) => f.write_str(s),
            Expr::BinOp { left, op, right } => {
                let left = Fmt(left.as_ref());
                let right = Fmt(right.as_ref());
                let op = op.as_str();
                write!(f, "{left}{op}{right}")
            }
        }
    }
}

impl Render for SelectStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT (")?;
        write_joined(f, &self.columns, ", ")?;
        write!(f, ") FROM {}", self.table)?;
        write_where(f, &self.where_)?;
        f.write_str(";")
    }
}

impl Render for InsertStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} (", self.table)?;
        write_joined(f, &self.columns, ", ")?;
        f.write_str(") VALUES (")?;
        write_joined(f, self.values.iter().map(Fmt), ", ")?;
        f.write_str(");")
    }
}

impl Render for UpdateStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        let assignments = self
            .assignments
            .iter()
            .map(|a| format!("{} = {}", a.column, Fmt(&a.value)));
        write_joined(f, assignments, ", ")?;
        write_where(f, &self.where_)?;
        f.write_str(";")
    }
}

impl Render for DeleteStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        write_where(f, &self.where_)?;
        f.write_str(";")
    }
}

impl Render for Stmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Select(s) => s.render(f),
            Stmt::Insert(s) => s.render(f),
            Stmt::Update(s) => s.render(f),
            Stmt::Delete(s) => s.render(f),
        }
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

/// Render a statement to SQL.
pub fn render(stmt: &impl Render) -> String {
    format!("{}", Fmt(stmt))
}
