//! Raw worksheet grids, as read from and written to a sheet store.

use crate::Coord;

/// Whether a cell holds nothing but whitespace.
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// A named 2-D grid of text cells.
///
/// Rows may be ragged; a missing cell reads as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns: the length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The cell at (column, row), or `""` when out of bounds.
    pub fn cell(&self, column: usize, row: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write a cell, growing the grid as needed.
    pub fn set(&mut self, coord: Coord, value: impl Into<String>) {
        if self.rows.len() <= coord.row {
            self.rows.resize_with(coord.row + 1, Vec::new);
        }
        let row = &mut self.rows[coord.row];
        if row.len() <= coord.column {
            row.resize_with(coord.column + 1, String::new);
        }
        row[coord.column] = value.into();
    }

    /// Whether every cell of `row` is blank (a missing row is blank).
    pub fn row_is_blank(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(|c| is_blank(c)))
    }
}

/// An ordered collection of worksheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// The named sheet, appended empty if it does not exist yet.
    pub fn sheet_or_insert(&mut self, name: &str) -> &mut Worksheet {
        match self.sheets.iter().position(|s| s.name == name) {
            Some(idx) => &mut self.sheets[idx],
            None => {
                self.sheets.push(Worksheet::new(name));
                let last = self.sheets.len() - 1;
                &mut self.sheets[last]
            }
        }
    }
}
