//! The fixed template layout.
//!
//! | row | meaning                                     |
//! |-----|---------------------------------------------|
//! | 1   | `A1` table name, `B1` script kind           |
//! | 2   | column names                                |
//! | 3   | column SQL types, e.g. `varchar(50)`        |
//! | 4   | `include` flags                             |
//! | 5   | `where` flags                               |
//! | 6+  | data, one statement per row                 |
//!
//! [`Template::from_worksheet`] lifts a raw grid into this typed shape once,
//! so nothing downstream indexes header rows by number.

use std::fmt;

use crate::{Worksheet, grid::is_blank};

pub const INFO_ROW: usize = 0;
pub const NAMES_ROW: usize = 1;
pub const TYPES_ROW: usize = 2;
pub const INCLUDE_ROW: usize = 3;
pub const WHERE_ROW: usize = 4;
pub const FIRST_DATA_ROW: usize = 5;

/// Info-row column holding the table name.
pub const TABLE_NAME_COLUMN: usize = 0;
/// Info-row column holding the script kind.
pub const SCRIPT_KIND_COLUMN: usize = 1;

pub const INCLUDE_KEYWORD: &str = "include";
pub const WHERE_KEYWORD: &str = "where";

/// The kind of statement generated for every data row of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl ScriptKind {
    pub const ALL: [ScriptKind; 4] = [
        ScriptKind::Insert,
        ScriptKind::Update,
        ScriptKind::Delete,
        ScriptKind::Select,
    ];

    /// Parse the info-row spelling (`insert`, `update`, `delete`, `select`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(ScriptKind::Insert),
            "update" => Some(ScriptKind::Update),
            "delete" => Some(ScriptKind::Delete),
            "select" => Some(ScriptKind::Select),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptKind::Insert => "insert",
            ScriptKind::Update => "update",
            ScriptKind::Delete => "delete",
            ScriptKind::Select => "select",
        }
    }

    /// Whether statements of this kind read the include row.
    pub fn uses_include(self) -> bool {
        !matches!(self, ScriptKind::Delete)
    }

    /// Whether statements of this kind read the where row.
    pub fn uses_where(self) -> bool {
        !matches!(self, ScriptKind::Insert)
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of an include or where flag cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    /// Blank cell.
    Unset,
    /// Exactly the keyword.
    Set,
    /// Anything else; holds the offending text.
    Invalid(String),
}

impl Flag {
    pub fn parse(cell: &str, keyword: &str) -> Self {
        if is_blank(cell) {
            Flag::Unset
        } else if cell == keyword {
            Flag::Set
        } else {
            Flag::Invalid(cell.to_string())
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Flag::Set)
    }
}

/// One column of the template header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Zero-based column index in the sheet.
    pub index: usize,
    pub name: String,
    /// Declared type, including any parameter suffix.
    pub raw_type: String,
    pub include: Flag,
    pub where_: Flag,
}

impl ColumnSpec {
    /// Whether the column takes part in any statement.
    pub fn is_flagged(&self) -> bool {
        self.include.is_set() || self.where_.is_set()
    }

    pub fn requires_quoting(&self) -> bool {
        crate::requires_quoting(&self.raw_type)
    }
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    /// Zero-based row index in the sheet.
    pub row: usize,
    /// One cell per template column.
    pub cells: Vec<String>,
}

impl DataRow {
    pub fn value(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| is_blank(c))
    }
}

/// A worksheet lifted into the template layout.
///
/// Construction never fails: malformed headers are kept verbatim so the
/// validator can point at them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Worksheet name.
    pub sheet: String,
    pub table: String,
    /// Script kind cell, trimmed but otherwise unparsed.
    pub kind_raw: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<DataRow>,
    /// Whether the final data row is entirely blank.
    pub trailing_blank: bool,
}

impl Template {
    pub fn from_worksheet(sheet: &Worksheet) -> Self {
        let width = sheet.width();

        let columns = (0..width)
            .map(|i| ColumnSpec {
                index: i,
                name: sheet.cell(i, NAMES_ROW).trim().to_string(),
                raw_type: sheet.cell(i, TYPES_ROW).trim().to_string(),
                include: Flag::parse(sheet.cell(i, INCLUDE_ROW), INCLUDE_KEYWORD),
                where_: Flag::parse(sheet.cell(i, WHERE_ROW), WHERE_KEYWORD),
            })
            .collect();

        let rows: Vec<DataRow> = (FIRST_DATA_ROW..sheet.height())
            .map(|row| DataRow {
                row,
                cells: (0..width).map(|i| sheet.cell(i, row).to_string()).collect(),
            })
            .collect();

        let trailing_blank = rows.last().is_some_and(DataRow::is_blank);

        Self {
            sheet: sheet.name.clone(),
            table: sheet
                .cell(TABLE_NAME_COLUMN, INFO_ROW)
                .trim()
                .to_string(),
            kind_raw: sheet
                .cell(SCRIPT_KIND_COLUMN, INFO_ROW)
                .trim()
                .to_string(),
            columns,
            rows,
            trailing_blank,
        }
    }

    pub fn kind(&self) -> Option<ScriptKind> {
        ScriptKind::parse(&self.kind_raw)
    }

    /// Number of template columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Columns flagged `include`, left to right.
    pub fn included(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.include.is_set())
    }

    /// Columns flagged `where`, left to right.
    pub fn predicates(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.where_.is_set())
    }

    /// Columns flagged `include` or `where`.
    pub fn flagged(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.is_flagged())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Data rows that produce statements: every row except a fully blank
    /// final row.
    pub fn script_rows(&self) -> &[DataRow] {
        if self.trailing_blank {
            &self.rows[..self.rows.len() - 1]
        } else {
            &self.rows
        }
    }

    /// The column a row's statement is written into: one past the last
    /// template column.
    pub fn output_column(&self) -> usize {
        self.width()
    }
}
