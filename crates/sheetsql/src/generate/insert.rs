//! INSERT statements.

use sheetsql_sql::InsertStmt;
use sheetsql_template::{DataRow, Template};

use super::common::value_expr;

/// `INSERT INTO t (included...) VALUES (values...);`
pub fn insert_stmt(template: &Template, row: &DataRow) -> InsertStmt {
    template
        .included()
        .fold(InsertStmt::new(&template.table), |stmt, c| {
            stmt.column(&c.name, value_expr(c, row))
        })
}
