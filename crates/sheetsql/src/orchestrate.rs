//! Running validation and generation over whole workbooks.
//!
//! The [`Orchestrator`] owns one run: it opens the workbook, checks every
//! data sheet, generates scripts for the valid ones and routes them to the
//! chosen destination. A sheet that fails never stops the others.

use camino::{Utf8Path, Utf8PathBuf};
use sheetsql_template::{Coord, NAMES_ROW, Template, Workbook, Worksheet};
use tracing::{debug, info, warn};

use crate::{
    CatalogSource, CatalogView, Error, Result, ScriptMap, SheetStore, TemplateBuilder,
    ValidationResult, generate, validate_generic, validate_with_catalog,
};

/// Worksheet name reserved for settings; never treated as a template.
pub const CONTROL_SHEET: &str = "configuration";

/// Heading written above the generated scripts in the workbook.
pub const SCRIPTS_HEADING: &str = "Scripts";

/// How sheets are checked before generation. Chosen once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Generic,
    /// Against one database of the catalog.
    Catalog { database: String },
}

/// Where generated scripts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// One `.sql` file with every statement of every valid sheet.
    SqlFile(Utf8PathBuf),
    /// The workbook itself, with scripts next to their rows, saved here.
    Workbook(Utf8PathBuf),
}

impl Destination {
    pub fn path(&self) -> &Utf8Path {
        match self {
            Destination::SqlFile(path) | Destination::Workbook(path) => path,
        }
    }
}

/// Which sink a run wrote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrittenSink {
    Sql,
    Excel,
    /// No sheet validated, so nothing was written.
    Nothing,
}

impl WrittenSink {
    pub fn as_str(self) -> &'static str {
        match self {
            WrittenSink::Sql => "SQL",
            WrittenSink::Excel => "Excel",
            WrittenSink::Nothing => "",
        }
    }
}

/// Aggregate validity of the data sheets of a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookStatus {
    AllValid,
    NoneValid,
    PartiallyValid,
}

impl WorkbookStatus {
    fn from_counts(valid: usize, total: usize) -> Self {
        if valid == 0 {
            WorkbookStatus::NoneValid
        } else if valid == total {
            WorkbookStatus::AllValid
        } else {
            WorkbookStatus::PartiallyValid
        }
    }
}

/// What happened to one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOutcome {
    Valid(ScriptMap),
    Invalid(ValidationResult),
    /// The sheet could not be checked or generated, e.g. the catalog failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub sheet: String,
    pub outcome: SheetOutcome,
}

impl SheetReport {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, SheetOutcome::Valid(_))
    }
}

/// The result of one run over a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sheets: Vec<SheetReport>,
    pub written: WrittenSink,
}

impl RunReport {
    pub fn status(&self) -> WorkbookStatus {
        let valid = self.sheets.iter().filter(|s| s.is_valid()).count();
        WorkbookStatus::from_counts(valid, self.sheets.len())
    }

    pub fn valid_sheets(&self) -> impl Iterator<Item = (&str, &ScriptMap)> {
        self.sheets.iter().filter_map(|s| match &s.outcome {
            SheetOutcome::Valid(scripts) => Some((s.sheet.as_str(), scripts)),
            _ => None,
        })
    }
}

pub struct Orchestrator<'a> {
    store: &'a mut dyn SheetStore,
    catalog: Option<&'a dyn CatalogSource>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a mut dyn SheetStore) -> Self {
        Self {
            store,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn CatalogSource) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn catalog(&self) -> Option<&'a dyn CatalogSource> {
        self.catalog
    }

    /// Check every data sheet and generate scripts for the valid ones,
    /// writing nothing.
    pub fn validate_workbook(
        &mut self,
        path: &Utf8Path,
        validation: &Validation,
    ) -> Result<RunReport> {
        let workbook = self.store.open_workbook(path)?;
        let catalog = self.catalog_view(validation)?;

        let sheets = data_sheets(&workbook)
            .map(|sheet| check_sheet(sheet, catalog.as_ref()))
            .collect();

        let report = RunReport {
            sheets,
            written: WrittenSink::Nothing,
        };
        info!(
            path = %path,
            sheets = report.sheets.len(),
            status = ?report.status(),
            "validated workbook"
        );
        Ok(report)
    }

    /// Validate, generate, and write the scripts of every valid sheet.
    pub fn write_scripts(
        &mut self,
        path: &Utf8Path,
        validation: &Validation,
        destination: &Destination,
    ) -> Result<RunReport> {
        let mut report = self.validate_workbook(path, validation)?;
        if report.valid_sheets().next().is_none() {
            warn!(path = %path, "no valid sheets, nothing written");
            return Ok(report);
        }

        report.written = match destination {
            Destination::SqlFile(out) => {
                let text: String = report
                    .valid_sheets()
                    .map(|(_, scripts)| scripts.to_sql_text())
                    .collect();
                std::fs::write(out, text).map_err(|e| Error::io(out, e))?;
                WrittenSink::Sql
            }
            Destination::Workbook(out) => {
                for (sheet, scripts) in report.valid_sheets() {
                    self.write_back(sheet, scripts)?;
                }
                self.store.save_workbook(out)?;
                WrittenSink::Excel
            }
        };

        info!(
            destination = %destination.path(),
            sink = report.written.as_str(),
            "wrote scripts"
        );
        Ok(report)
    }

    /// Add a new template sheet to the workbook at `path`, creating the
    /// workbook if it does not exist.
    pub fn write_template(
        &mut self,
        path: &Utf8Path,
        sheet: &str,
        builder: &TemplateBuilder,
    ) -> Result<()> {
        match self.store.open_workbook(path) {
            Ok(workbook) if workbook.sheet(sheet).is_some() => {
                return Err(Error::SheetExists(sheet.to_string()));
            }
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                debug!(path = %path, "starting a new workbook");
            }
            Err(e) => return Err(e),
        }

        for (coord, value) in builder.cells()? {
            self.store.write_cell(sheet, coord, &value)?;
        }
        self.store.save_workbook(path)?;

        info!(
            path = %path,
            sheet,
            table = builder.table(),
            kind = %builder.kind(),
            "wrote template"
        );
        Ok(())
    }

    fn catalog_view(&self, validation: &Validation) -> Result<Option<CatalogView<'a>>> {
        match validation {
            Validation::Generic => Ok(None),
            Validation::Catalog { database } => {
                let catalog = self.catalog.ok_or(Error::NoCatalog)?;
                CatalogView::open(catalog, database).map(Some)
            }
        }
    }

    fn write_back(&mut self, sheet: &str, scripts: &ScriptMap) -> Result<()> {
        if let Some((first, _)) = scripts.iter().next() {
            let heading = Coord::new(first.column, NAMES_ROW)?;
            self.store.write_cell(sheet, heading, SCRIPTS_HEADING)?;
        }
        for (coord, script) in scripts.iter() {
            self.store.write_cell(sheet, *coord, script)?;
        }
        Ok(())
    }
}

fn check_sheet(sheet: &Worksheet, catalog: Option<&CatalogView<'_>>) -> SheetReport {
    let template = Template::from_worksheet(sheet);
    let outcome = match check_template(&template, catalog) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(sheet = %sheet.name, error = %e, "sheet could not be processed");
            SheetOutcome::Failed(e.to_string())
        }
    };
    SheetReport {
        sheet: sheet.name.clone(),
        outcome,
    }
}

fn check_template(template: &Template, catalog: Option<&CatalogView<'_>>) -> Result<SheetOutcome> {
    let result = match catalog {
        Some(view) => validate_with_catalog(template, view)?,
        None => validate_generic(template),
    };

    if !result.is_valid() {
        warn!(
            sheet = %template.sheet,
            violations = result.violations.len(),
            "sheet is invalid"
        );
        return Ok(SheetOutcome::Invalid(result));
    }

    Ok(SheetOutcome::Valid(generate(template)?))
}

/// Data sheets of a workbook, without the control sheet.
pub fn data_sheets(workbook: &Workbook) -> impl Iterator<Item = &Worksheet> {
    workbook.sheets.iter().filter(|s| s.name != CONTROL_SHEET)
}
