//! Building new template sheets from catalog metadata.

use sheetsql_template::{
    Coord, INCLUDE_KEYWORD, INCLUDE_ROW, INFO_ROW, NAMES_ROW, SCRIPT_KIND_COLUMN, ScriptKind,
    TABLE_NAME_COLUMN, TYPES_ROW, WHERE_KEYWORD, WHERE_ROW,
};

use crate::{ColumnMetadata, IncludePolicy, Result};

/// The header of a new template sheet for one table.
///
/// Include flags start out as the column's [`IncludePolicy`] demands:
/// required columns are included and cannot be dropped, forbidden columns
/// are excluded and cannot be added.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    table: String,
    kind: ScriptKind,
    columns: Vec<ColumnMetadata>,
    include: Vec<bool>,
    where_: Vec<bool>,
}

impl TemplateBuilder {
    pub fn new(table: impl Into<String>, kind: ScriptKind, columns: Vec<ColumnMetadata>) -> Self {
        let include = columns
            .iter()
            .map(|c| c.include_policy(kind) == IncludePolicy::Required)
            .collect();
        let where_ = vec![false; columns.len()];
        Self {
            table: table.into(),
            kind,
            columns,
            include,
            where_,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    /// The include policy of column `index`; `Forbidden` when the kind has
    /// no include row.
    pub fn include_policy(&self, index: usize) -> IncludePolicy {
        if !self.kind.uses_include() {
            return IncludePolicy::Forbidden;
        }
        self.columns[index].include_policy(self.kind)
    }

    /// Choose whether an optional column is included. Other columns keep
    /// their forced value.
    pub fn set_include(&mut self, index: usize, include: bool) {
        if self.include_policy(index) == IncludePolicy::Optional {
            self.include[index] = include;
        }
    }

    /// Choose whether a column is a predicate. Ignored for inserts.
    pub fn set_where(&mut self, index: usize, where_: bool) {
        if self.kind.uses_where() {
            self.where_[index] = where_;
        }
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.include[index]
    }

    pub fn is_predicate(&self, index: usize) -> bool {
        self.where_[index]
    }

    /// Non-blank header cells, row by row.
    pub fn cells(&self) -> Result<Vec<(Coord, String)>> {
        let mut cells = vec![
            (Coord::new(TABLE_NAME_COLUMN, INFO_ROW)?, self.table.clone()),
            (
                Coord::new(SCRIPT_KIND_COLUMN, INFO_ROW)?,
                self.kind.to_string(),
            ),
        ];

        for (i, column) in self.columns.iter().enumerate() {
            cells.push((Coord::new(i, NAMES_ROW)?, column.name.clone()));
        }
        for (i, column) in self.columns.iter().enumerate() {
            cells.push((Coord::new(i, TYPES_ROW)?, column.sql_type.clone()));
        }
        for i in (0..self.columns.len()).filter(|&i| self.include[i]) {
            cells.push((Coord::new(i, INCLUDE_ROW)?, INCLUDE_KEYWORD.to_string()));
        }
        for i in (0..self.columns.len()).filter(|&i| self.where_[i]) {
            cells.push((Coord::new(i, WHERE_ROW)?, WHERE_KEYWORD.to_string()));
        }

        Ok(cells)
    }
}
