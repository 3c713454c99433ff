//! SELECT statements.

use sheetsql_sql::SelectStmt;
use sheetsql_template::{DataRow, Template};

use super::common::where_expr;

/// `SELECT (included...) FROM t WHERE predicates;`
pub fn select_stmt(template: &Template, row: &DataRow) -> SelectStmt {
    let mut stmt =
        SelectStmt::new(&template.table).columns(template.included().map(|c| &c.name));

    if let Some(expr) = where_expr(template, row) {
        stmt = stmt.where_(expr);
    }
    stmt
}
