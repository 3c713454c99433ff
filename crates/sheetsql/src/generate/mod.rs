//! Script generation from validated templates.
//!
//! Every script row of a sheet becomes one statement. Callers validate
//! first; generation trusts the header and only fails when the script kind
//! is unknown or the output column is not addressable.

mod common;
mod delete;
mod insert;
mod select;
mod update;

use indexmap::IndexMap;
use sheetsql_sql::{Stmt, render};
use sheetsql_template::{Coord, DataRow, ScriptKind, Template};
use tracing::debug;

use crate::{Error, Result};

pub use delete::delete_stmt;
pub use insert::insert_stmt;
pub use select::select_stmt;
pub use update::update_stmt;

/// Generated statements keyed by the cell each one is written to, in row
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptMap {
    scripts: IndexMap<Coord, String>,
}

impl ScriptMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: Coord, script: String) {
        self.scripts.insert(coord, script);
    }

    pub fn get(&self, coord: &Coord) -> Option<&str> {
        self.scripts.get(coord).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &str)> {
        self.scripts.iter().map(|(c, s)| (c, s.as_str()))
    }

    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.scripts.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Every statement followed by a newline.
    pub fn to_sql_text(&self) -> String {
        self.statements().fold(String::new(), |mut out, s| {
            out.push_str(s);
            out.push('\n');
            out
        })
    }
}

/// The statement for one data row.
pub fn row_stmt(template: &Template, kind: ScriptKind, row: &DataRow) -> Stmt {
    match kind {
        ScriptKind::Insert => Stmt::Insert(insert_stmt(template, row)),
        ScriptKind::Update => Stmt::Update(update_stmt(template, row)),
        ScriptKind::Delete => Stmt::Delete(delete_stmt(template, row)),
        ScriptKind::Select => Stmt::Select(select_stmt(template, row)),
    }
}

/// Generate one statement per script row, keyed by the output cell of that
/// row.
pub fn generate(template: &Template) -> Result<ScriptMap> {
    let kind = template
        .kind()
        .ok_or_else(|| Error::UnknownScriptKind(template.kind_raw.clone()))?;
    let column = template.output_column();

    let mut scripts = ScriptMap::new();
    for row in template.script_rows() {
        let coord = Coord::new(column, row.row)?;
        scripts.insert(coord, render(&row_stmt(template, kind, row)));
    }

    debug!(
        sheet = %template.sheet,
        %kind,
        scripts = scripts.len(),
        "generated scripts"
    );
    Ok(scripts)
}
