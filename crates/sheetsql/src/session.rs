//! The interactive flow of one run.
//!
//! A [`Session`] settles every choice a mode needs, from the
//! [`SessionDefaults`] when they are known and from the [`Prompter`]
//! otherwise, then hands the work to the [`Orchestrator`].

use camino::{Utf8Path, Utf8PathBuf};
use sheetsql_template::ScriptKind;
use tracing::debug;

use crate::{
    CatalogSource, Destination, Error, IncludePolicy, Mode, Orchestrator, Prompter, Result,
    RunReport, TemplateBuilder, TwoWay, Validation, WorkbookStatus, WrittenSink,
};

/// Validation flavour, before a database is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationChoice {
    Generic,
    Sql,
}

/// Sink, before a path is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkChoice {
    Sql,
    Excel,
}

/// Answers known before the run starts, from flags or config.
#[derive(Debug, Clone, Default)]
pub struct SessionDefaults {
    pub validation: Option<ValidationChoice>,
    pub database: Option<String>,
    pub sink: Option<SinkChoice>,
    pub output: Option<Utf8PathBuf>,
    pub table: Option<String>,
    pub kind: Option<ScriptKind>,
    pub sheet: Option<String>,
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Scripts(RunReport),
    Validated(RunReport),
    Template { sheet: String, path: Utf8PathBuf },
}

pub struct Session<'a> {
    prompter: &'a mut dyn Prompter,
    orchestrator: Orchestrator<'a>,
    defaults: SessionDefaults,
}

impl<'a> Session<'a> {
    pub fn new(
        prompter: &'a mut dyn Prompter,
        orchestrator: Orchestrator<'a>,
        defaults: SessionDefaults,
    ) -> Self {
        Self {
            prompter,
            orchestrator,
            defaults,
        }
    }

    /// Run `mode`, asking for it when not given.
    pub fn run(&mut self, mode: Option<Mode>, workbook: &Utf8Path) -> Result<SessionOutcome> {
        let mode = match mode {
            Some(mode) => mode,
            None => self.prompter.choose_mode()?,
        };
        debug!(%mode, workbook = %workbook, "starting session");

        match mode {
            Mode::Scripts => self.scripts(workbook).map(SessionOutcome::Scripts),
            Mode::Validate => self.validate(workbook).map(SessionOutcome::Validated),
            Mode::Template => {
                let sheet = self.template(workbook)?;
                Ok(SessionOutcome::Template {
                    sheet,
                    path: workbook.to_owned(),
                })
            }
        }
    }

    /// Validate the workbook and write scripts for its valid sheets.
    pub fn scripts(&mut self, workbook: &Utf8Path) -> Result<RunReport> {
        let validation = self.choose_validation()?;
        let destination = self.choose_destination(workbook)?;

        let report = self
            .orchestrator
            .write_scripts(workbook, &validation, &destination)?;

        if report.written == WrittenSink::Nothing {
            self.prompter.confirm("No files were changed.")?;
        } else {
            if report.status() == WorkbookStatus::PartiallyValid {
                self.prompter.confirm(
                    "CAUTION: some sheets are invalid; scripts were only generated for the valid ones.",
                )?;
            }
            self.prompter
                .confirm(&format!("Scripts saved to: '{}'", destination.path()))?;
        }
        Ok(report)
    }

    /// Validate the workbook and report, writing nothing.
    pub fn validate(&mut self, workbook: &Utf8Path) -> Result<RunReport> {
        let validation = self.choose_validation()?;
        let report = self.orchestrator.validate_workbook(workbook, &validation)?;

        let message = match report.status() {
            WorkbookStatus::AllValid => "VALID. Every sheet in the workbook is valid.",
            WorkbookStatus::PartiallyValid => {
                "CAUTION: the workbook is only partially valid. Fix the reported cells before generating scripts."
            }
            WorkbookStatus::NoneValid => "INVALID. No sheet in the workbook is valid.",
        };
        self.prompter.confirm(message)?;
        Ok(report)
    }

    /// Add a template sheet built from catalog metadata. Returns the name
    /// of the new sheet.
    pub fn template(&mut self, workbook: &Utf8Path) -> Result<String> {
        let catalog = self.orchestrator.catalog().ok_or(Error::NoCatalog)?;
        let database = self.choose_database(catalog)?;
        let table = match self.defaults.table.clone() {
            Some(table) => table,
            None => {
                let tables = catalog.list_tables(&database)?;
                self.prompter.choose_from_list("Choose a table", &tables)?
            }
        };
        let kind = match self.defaults.kind {
            Some(kind) => kind,
            None => self.choose_kind()?,
        };

        let columns = catalog.column_metadata(&database, &table)?;
        let mut builder = TemplateBuilder::new(&table, kind, columns);

        for i in 0..builder.columns().len() {
            if builder.include_policy(i) != IncludePolicy::Optional {
                continue;
            }
            let column = &builder.columns()[i];
            let prompt = format!(
                "Include column '{}' ({}) in {} scripts?",
                column.name, column.sql_type, kind
            );
            let answer = self.prompter.choose_two_way(&prompt, "Yes", "No")?;
            builder.set_include(i, answer == TwoWay::First);
        }

        if kind.uses_where() {
            for i in 0..builder.columns().len() {
                let prompt = format!(
                    "Use column '{}' in the WHERE clause?",
                    builder.columns()[i].name
                );
                let answer = self.prompter.choose_two_way(&prompt, "Yes", "No")?;
                builder.set_where(i, answer == TwoWay::First);
            }
        }

        let sheet = match self.defaults.sheet.clone() {
            Some(sheet) => sheet,
            None => {
                let name = self
                    .prompter
                    .enter_text("Name of the new sheet (blank for the table name)", "Sheet")?;
                if name.trim().is_empty() {
                    table.clone()
                } else {
                    name.trim().to_string()
                }
            }
        };

        self.orchestrator.write_template(workbook, &sheet, &builder)?;
        self.prompter.confirm(&format!(
            "Template sheet '{sheet}' for table '{table}' written to '{workbook}'"
        ))?;
        Ok(sheet)
    }

    fn choose_validation(&mut self) -> Result<Validation> {
        let choice = match self.defaults.validation {
            Some(choice) => choice,
            None => match self.prompter.choose_two_way(
                "Validate the workbook against the SQL catalog or with generic rules?",
                "SQL",
                "Generic",
            )? {
                TwoWay::First => ValidationChoice::Sql,
                TwoWay::Second => ValidationChoice::Generic,
            },
        };

        match choice {
            ValidationChoice::Generic => Ok(Validation::Generic),
            ValidationChoice::Sql => {
                let catalog = self.orchestrator.catalog().ok_or(Error::NoCatalog)?;
                let database = self.choose_database(catalog)?;
                Ok(Validation::Catalog { database })
            }
        }
    }

    fn choose_database(&mut self, catalog: &dyn CatalogSource) -> Result<String> {
        match self.defaults.database.clone() {
            Some(database) => Ok(database),
            None => {
                let databases = catalog.list_databases()?;
                self.prompter.choose_from_list("Choose a database", &databases)
            }
        }
    }

    fn choose_kind(&mut self) -> Result<ScriptKind> {
        let kinds: Vec<String> = ScriptKind::ALL.iter().map(|k| k.to_string()).collect();
        let picked = self.prompter.choose_from_list("Choose a script type", &kinds)?;
        ScriptKind::parse(&picked).ok_or(Error::UnknownScriptKind(picked))
    }

    fn choose_destination(&mut self, workbook: &Utf8Path) -> Result<Destination> {
        let sink = match self.defaults.sink {
            Some(sink) => sink,
            None => match self.prompter.choose_two_way(
                "Write the scripts to a .sql file or back into the workbook?",
                "SQL",
                "Excel",
            )? {
                TwoWay::First => SinkChoice::Sql,
                TwoWay::Second => SinkChoice::Excel,
            },
        };

        let fallback = match sink {
            SinkChoice::Sql => workbook.with_extension("sql"),
            SinkChoice::Excel => workbook.to_owned(),
        };
        let path = match self.defaults.output.clone() {
            Some(path) => path,
            None => {
                let entered = self.prompter.enter_text(
                    &format!("Save to (blank for '{fallback}')"),
                    "Path",
                )?;
                if entered.trim().is_empty() {
                    fallback
                } else {
                    Utf8PathBuf::from(entered.trim())
                }
            }
        };

        Ok(match sink {
            SinkChoice::Sql => Destination::SqlFile(path),
            SinkChoice::Excel => Destination::Workbook(path),
        })
    }
}
