//! UPDATE statements.

use sheetsql_sql::UpdateStmt;
use sheetsql_template::{DataRow, Template};

use super::common::{value_expr, where_expr};

/// `UPDATE t SET included = value, ... WHERE predicates;`
pub fn update_stmt(template: &Template, row: &DataRow) -> UpdateStmt {
    let mut stmt = template
        .included()
        .fold(UpdateStmt::new(&template.table), |stmt, c| {
            stmt.set(&c.name, value_expr(c, row))
        });

    if let Some(expr) = where_expr(template, row) {
        stmt = stmt.where_(expr);
    }
    stmt
}
