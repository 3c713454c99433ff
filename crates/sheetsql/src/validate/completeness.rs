//! Rule: every cell a statement reads must hold a value.

use sheetsql_template::is_blank;

use super::{RuleContext, ViolationBuilder};

pub fn lint_missing_values(ctx: &mut RuleContext<'_>) {
    let template = ctx.template;
    for row in template.script_rows() {
        for column in template.flagged() {
            if is_blank(row.value(column.index)) {
                ViolationBuilder::completeness("missing-value")
                    .at(column.index, row.row)
                    .msg(format!("Missing value for column '{}'", column.name))
                    .emit(ctx.violations);
            }
        }
    }
}
