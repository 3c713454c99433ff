//! Rules: the header must be well formed.

use sheetsql_template::{
    Coord, Flag, INCLUDE_KEYWORD, INCLUDE_ROW, INFO_ROW, MAX_COLUMN, NAMES_ROW,
    SCRIPT_KIND_COLUMN, ScriptKind, TABLE_NAME_COLUMN, TYPES_ROW, WHERE_KEYWORD, WHERE_ROW,
    classify, is_blank,
};

use super::{RuleContext, ViolationBuilder};

pub fn lint_table_name(ctx: &mut RuleContext<'_>) {
    if is_blank(&ctx.template.table) {
        ViolationBuilder::structural("missing-table-name")
            .at(TABLE_NAME_COLUMN, INFO_ROW)
            .msg("Table name is blank")
            .emit(ctx.violations);
    }
}

/// Scripts go one column past the template, which must still be
/// addressable, so template columns end at `AV`.
pub fn lint_sheet_width(ctx: &mut RuleContext<'_>) {
    let width = ctx.template.width();
    if width <= MAX_COLUMN {
        return;
    }
    let last = Coord {
        column: MAX_COLUMN - 1,
        row: NAMES_ROW,
    };
    ViolationBuilder::structural("too-many-columns")
        .at(MAX_COLUMN, NAMES_ROW)
        .msg(format!(
            "Template has {width} columns; columns past {} leave no room for scripts",
            last.column_letters()
        ))
        .emit(ctx.violations);
}

pub fn lint_script_kind(ctx: &mut RuleContext<'_>) {
    if ctx.template.kind().is_some() {
        return;
    }
    let allowed = ScriptKind::ALL.map(ScriptKind::as_str).join(", ");
    let message = if ctx.template.kind_raw.is_empty() {
        format!("Script type is blank. Expected one of: {allowed}")
    } else {
        format!(
            "Unknown script type '{}'. Expected one of: {allowed}",
            ctx.template.kind_raw
        )
    };
    ViolationBuilder::structural("invalid-script-kind")
        .at(SCRIPT_KIND_COLUMN, INFO_ROW)
        .msg(message)
        .emit(ctx.violations);
}

/// Flag cells must be blank or exactly the keyword.
pub fn lint_flag_cells(ctx: &mut RuleContext<'_>) {
    for column in &ctx.template.columns {
        if let Flag::Invalid(text) = &column.include {
            ViolationBuilder::structural("invalid-include-flag")
                .at(column.index, INCLUDE_ROW)
                .msg(format!(
                    "Include flag must be blank or '{INCLUDE_KEYWORD}', found '{text}'"
                ))
                .emit(ctx.violations);
        }
        if let Flag::Invalid(text) = &column.where_ {
            ViolationBuilder::structural("invalid-where-flag")
                .at(column.index, WHERE_ROW)
                .msg(format!(
                    "Where flag must be blank or '{WHERE_KEYWORD}', found '{text}'"
                ))
                .emit(ctx.violations);
        }
    }
}

/// Flagged columns need a name and a recognized type.
pub fn lint_flagged_headers(ctx: &mut RuleContext<'_>) {
    for column in ctx.template.flagged() {
        if column.name.is_empty() {
            ViolationBuilder::structural("missing-column-name")
                .at(column.index, NAMES_ROW)
                .msg("Flagged column has no name")
                .emit(ctx.violations);
        }

        if column.raw_type.is_empty() {
            ViolationBuilder::structural("missing-column-type")
                .at(column.index, TYPES_ROW)
                .msg(format!("Column '{}' has no type", column.name))
                .emit(ctx.violations);
        } else if classify(&column.raw_type).is_none() {
            ViolationBuilder::structural("unknown-type")
                .at(column.index, TYPES_ROW)
                .msg(format!(
                    "Unrecognized type '{}' for column '{}'",
                    column.raw_type, column.name
                ))
                .emit(ctx.violations);
        }
    }
}
