//! Rules: the header must agree with the database.

use sheetsql_template::{INCLUDE_ROW, INFO_ROW, NAMES_ROW, TABLE_NAME_COLUMN, TYPES_ROW, base_type};

use super::{RuleContext, ViolationBuilder};
use crate::{CatalogView, ColumnMetadata, IncludePolicy};

/// Returns whether the table exists; the remaining catalog rules need it.
pub fn lint_unknown_table(catalog: &CatalogView<'_>, ctx: &mut RuleContext<'_>) -> bool {
    let table = &ctx.template.table;
    if catalog.has_table(table) {
        return true;
    }
    // A blank name was already reported by the structural rules.
    if !table.is_empty() {
        ViolationBuilder::catalog("unknown-table")
            .at(TABLE_NAME_COLUMN, INFO_ROW)
            .msg(format!(
                "Table '{}' does not exist in database '{}'",
                table,
                catalog.database()
            ))
            .emit(ctx.violations);
    }
    false
}

pub fn lint_unknown_columns(columns: &[ColumnMetadata], ctx: &mut RuleContext<'_>) {
    for column in ctx.template.flagged() {
        if column.name.is_empty() || columns.iter().any(|c| c.name == column.name) {
            continue;
        }
        let available = columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ViolationBuilder::catalog("unknown-column")
            .at(column.index, NAMES_ROW)
            .msg(format!(
                "Unknown column '{}' in table '{}'. Available columns: {}",
                column.name, ctx.template.table, available
            ))
            .emit(ctx.violations);
    }
}

/// Declared types must match the catalog once parameters are stripped.
pub fn lint_type_mismatches(columns: &[ColumnMetadata], ctx: &mut RuleContext<'_>) {
    for column in ctx.template.flagged() {
        let Some(meta) = columns.iter().find(|c| c.name == column.name) else {
            continue;
        };
        let declared = base_type(&column.raw_type);
        let actual = base_type(&meta.sql_type);
        if declared != actual {
            ViolationBuilder::catalog("type-mismatch")
                .at(column.index, TYPES_ROW)
                .msg(format!(
                    "Column '{}' is declared '{}' but the table has '{}'",
                    column.name, declared, actual
                ))
                .emit(ctx.violations);
        }
    }
}

/// Required columns must be included; identity columns must not be.
pub fn lint_include_policy(columns: &[ColumnMetadata], ctx: &mut RuleContext<'_>) {
    let Some(kind) = ctx.template.kind() else {
        return;
    };

    for meta in columns {
        let sheet_column = ctx.template.column(&meta.name);
        let included = sheet_column.is_some_and(|c| c.include.is_set());

        match meta.include_policy(kind) {
            IncludePolicy::Required if !included => {
                let builder = ViolationBuilder::catalog("missing-required-column");
                let builder = match sheet_column {
                    Some(c) => builder.at(c.index, INCLUDE_ROW),
                    None => builder,
                };
                builder
                    .msg(format!(
                        "Column '{}' is not nullable and must be included in {} scripts",
                        meta.name, kind
                    ))
                    .emit(ctx.violations);
            }
            IncludePolicy::Forbidden if included => {
                let builder = ViolationBuilder::catalog("identity-included");
                let builder = match sheet_column {
                    Some(c) => builder.at(c.index, INCLUDE_ROW),
                    None => builder,
                };
                builder
                    .msg(format!(
                        "Identity column '{}' cannot be included in {} scripts",
                        meta.name, kind
                    ))
                    .emit(ctx.violations);
            }
            _ => {}
        }
    }
}
