//! DELETE statements.

use sheetsql_sql::DeleteStmt;
use sheetsql_template::{DataRow, Template};

use super::common::where_expr;

/// `DELETE FROM t WHERE predicates;`
pub fn delete_stmt(template: &Template, row: &DataRow) -> DeleteStmt {
    let stmt = DeleteStmt::new(&template.table);
    match where_expr(template, row) {
        Some(expr) => stmt.where_(expr),
        None => stmt,
    }
}
