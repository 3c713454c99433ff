use sheetsql_sql::Expr;
use sheetsql_template::{ColumnSpec, DataRow, Template};

/// The row's value for a column, quoted when the column type requires it.
pub(super) fn value_expr(column: &ColumnSpec, row: &DataRow) -> Expr {
    Expr::value(row.value(column.index), column.requires_quoting())
}

/// `col = value` for every where-flagged column, joined with AND.
pub(super) fn where_expr(template: &Template, row: &DataRow) -> Option<Expr> {
    Expr::all(
        template
            .predicates()
            .map(|c| Expr::column(&c.name).eq(value_expr(c, row))),
    )
}
