//! Where workbooks come from and go to.
//!
//! A [`SheetStore`] holds one open workbook at a time: it is loaded with
//! [`open_workbook`](SheetStore::open_workbook), edited cell by cell, then
//! written out with [`save_workbook`](SheetStore::save_workbook).

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use sheetsql_template::{Coord, Workbook, Worksheet};
use tracing::debug;

use crate::{Error, Result};

pub trait SheetStore {
    /// Load a workbook and make it the open one. On failure the open
    /// workbook is left empty, so a save afterwards starts a new workbook.
    fn open_workbook(&mut self, path: &Utf8Path) -> Result<Workbook>;

    /// Write one cell of the open workbook, creating the sheet if needed.
    fn write_cell(&mut self, sheet: &str, coord: Coord, value: &str) -> Result<()>;

    /// Persist the open workbook to `path`.
    fn save_workbook(&mut self, path: &Utf8Path) -> Result<()>;
}

/// Workbooks kept in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: HashMap<Utf8PathBuf, Workbook>,
    open: Workbook,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(mut self, path: impl Into<Utf8PathBuf>, workbook: Workbook) -> Self {
        self.books.insert(path.into(), workbook);
        self
    }

    /// The workbook last saved (or seeded) at `path`.
    pub fn workbook(&self, path: &Utf8Path) -> Option<&Workbook> {
        self.books.get(path)
    }
}

impl SheetStore for MemoryStore {
    fn open_workbook(&mut self, path: &Utf8Path) -> Result<Workbook> {
        self.open = Workbook::default();
        let book = self
            .books
            .get(path)
            .cloned()
            .ok_or_else(|| Error::io(path, std::io::ErrorKind::NotFound.into()))?;
        self.open = book.clone();
        Ok(book)
    }

    fn write_cell(&mut self, sheet: &str, coord: Coord, value: &str) -> Result<()> {
        self.open.sheet_or_insert(sheet).set(coord, value);
        Ok(())
    }

    fn save_workbook(&mut self, path: &Utf8Path) -> Result<()> {
        self.books.insert(path.to_owned(), self.open.clone());
        Ok(())
    }
}

/// Workbooks stored as CSV.
///
/// A workbook is a directory holding one `<sheet>.csv` per worksheet; sheets
/// are ordered by file name. A single `.csv` file also opens as a
/// one-sheet workbook named after the file stem.
#[derive(Debug, Default)]
pub struct CsvStore {
    open: Workbook,
}

impl CsvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_sheet(path: &Utf8Path) -> Result<Worksheet> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::csv(path, e))?;
            // Blank lines produce no record; they are still sheet rows.
            if let Some(position) = record.position() {
                let line = record_line(&text, position.byte() as usize);
                rows.resize_with(rows.len().max(line), Vec::new);
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        let name = path.file_stem().unwrap_or_default();
        Ok(Worksheet::with_rows(name, rows))
    }

    fn write_sheet(path: &Utf8Path, sheet: &Worksheet) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;

        let width = sheet.width();
        for row in &sheet.rows {
            let padded = row
                .iter()
                .map(String::as_str)
                .chain(std::iter::repeat_n("", width - row.len()));
            writer.write_record(padded).map_err(|e| Error::csv(path, e))?;
        }
        writer.flush().map_err(|e| Error::io(path, e))
    }
}

/// Zero-based line of the record the reader started scanning at `byte`.
///
/// A record's position points at the end of the previous record, before
/// any blank lines the reader skipped.
fn record_line(text: &str, byte: usize) -> usize {
    let bytes = text.as_bytes();
    let byte = byte.min(bytes.len());
    let start = byte
        + bytes[byte..]
            .iter()
            .take_while(|b| matches!(b, b'\r' | b'\n'))
            .count();
    bytes[..start].iter().filter(|&&b| b == b'\n').count()
}

fn is_csv_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

impl SheetStore for CsvStore {
    fn open_workbook(&mut self, path: &Utf8Path) -> Result<Workbook> {
        self.open = Workbook::default();
        let book = if is_csv_file(path) {
            Workbook::new(vec![Self::read_sheet(path)?])
        } else {
            let mut files = Vec::new();
            for entry in path.read_dir_utf8().map_err(|e| Error::io(path, e))? {
                let entry = entry.map_err(|e| Error::io(path, e))?;
                if is_csv_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            files.sort();
            files
                .iter()
                .map(|f| Self::read_sheet(f))
                .collect::<Result<Vec<_>>>()
                .map(Workbook::new)?
        };

        debug!(path = %path, sheets = book.sheets.len(), "opened workbook");
        self.open = book.clone();
        Ok(book)
    }

    fn write_cell(&mut self, sheet: &str, coord: Coord, value: &str) -> Result<()> {
        self.open.sheet_or_insert(sheet).set(coord, value);
        Ok(())
    }

    fn save_workbook(&mut self, path: &Utf8Path) -> Result<()> {
        if is_csv_file(path) {
            return match self.open.sheets.as_slice() {
                [sheet] => Self::write_sheet(path, sheet),
                sheets => Err(Error::SingleSheetFile {
                    path: path.to_owned(),
                    sheets: sheets.len(),
                }),
            };
        }

        std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
        for sheet in &self.open.sheets {
            Self::write_sheet(&path.join(format!("{}.csv", sheet.name)), sheet)?;
        }
        debug!(path = %path, sheets = self.open.sheets.len(), "saved workbook");
        Ok(())
    }
}
