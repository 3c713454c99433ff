mod config;
mod prompter;

use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use sheetsql::{
    CatalogSource, CsvStore, Mode, Orchestrator, Prompter, RunReport, Session, SessionDefaults,
    SessionOutcome, SheetOutcome, SinkChoice, SnapshotCatalog, ValidationChoice, WorkbookStatus,
};
use sheetsql_template::ScriptKind;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::prompter::TerminalPrompter;

/// Validate spreadsheet templates and generate SQL scripts from their rows.
///
/// A workbook is a directory of CSV files, one per worksheet, or a single
/// CSV file.
#[derive(Parser, Debug)]
#[command(name = "sheetsql", version, about)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Command to run; asked interactively when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a workbook and write SQL scripts for its valid sheets
    Scripts {
        workbook: Utf8PathBuf,

        #[command(flatten)]
        validation: ValidationArgs,

        /// Write to a .sql file or back into the workbook
        #[arg(long, value_enum)]
        to: Option<SinkArg>,

        /// Where to write; defaults to `<workbook>.sql` or the workbook itself
        #[arg(long)]
        output: Option<Utf8PathBuf>,
    },
    /// Validate a workbook and report, writing nothing
    Validate {
        workbook: Utf8PathBuf,

        #[command(flatten)]
        validation: ValidationArgs,
    },
    /// Add a template sheet for a database table to a workbook
    Template {
        workbook: Utf8PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Table to build the template for
        #[arg(long)]
        table: Option<String>,

        /// Script kind of the template
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Name of the new sheet; defaults to the table name
        #[arg(long)]
        sheet: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct CatalogArgs {
    /// Catalog snapshot (JSON) to validate against
    #[arg(long)]
    catalog: Option<Utf8PathBuf>,

    /// Database within the catalog
    #[arg(long)]
    database: Option<String>,
}

#[derive(Args, Debug, Default)]
struct ValidationArgs {
    /// Validate against the catalog (`sql`) or with generic rules
    #[arg(long, value_enum)]
    validation: Option<ValidationArg>,

    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValidationArg {
    Generic,
    Sql,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SinkArg {
    Sql,
    Excel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Insert,
    Update,
    Delete,
    Select,
}

impl From<KindArg> for ScriptKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Insert => ScriptKind::Insert,
            KindArg::Update => ScriptKind::Update,
            KindArg::Delete => ScriptKind::Delete,
            KindArg::Select => ScriptKind::Select,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "sheetsql=debug" } else { "sheetsql=info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = level.parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Everything a run needs, after flags and config are merged.
struct Plan {
    mode: Option<Mode>,
    workbook: Option<Utf8PathBuf>,
    catalog: Option<Utf8PathBuf>,
    defaults: SessionDefaults,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = match config::load() {
        Ok((config, path)) => {
            debug!(path = %path, "loaded config");
            (config, Some(path))
        }
        Err(ConfigError::NotFound) => (Config::default(), None),
        Err(e) => return Err(e.into()),
    };

    let plan = plan(cli.command, &config, config_path.as_deref());

    let catalog = match &plan.catalog {
        Some(path) => {
            let catalog = SnapshotCatalog::load(path)?;
            let server = config
                .catalog
                .server
                .clone()
                .or_else(|| catalog.server.clone())
                .unwrap_or_else(|| path.to_string());
            info!(%server, "using catalog");
            Some(catalog)
        }
        None => None,
    };

    let mut prompter = TerminalPrompter::stdio();
    let mode = match plan.mode {
        Some(mode) => mode,
        None => prompter.choose_mode()?,
    };
    let workbook = match plan.workbook {
        Some(workbook) => workbook,
        None => Utf8PathBuf::from(prompter.enter_text("Which workbook?", "Path")?),
    };

    let mut store = CsvStore::new();
    let mut orchestrator = Orchestrator::new(&mut store);
    if let Some(catalog) = &catalog {
        orchestrator = orchestrator.with_catalog(catalog as &dyn CatalogSource);
    }

    let outcome =
        Session::new(&mut prompter, orchestrator, plan.defaults).run(Some(mode), &workbook)?;

    match outcome {
        SessionOutcome::Scripts(report) | SessionOutcome::Validated(report) => {
            print_report(&report);
        }
        SessionOutcome::Template { sheet, path } => {
            println!("{} {} in {}", "created".green().bold(), sheet, path);
        }
    }
    Ok(())
}

/// Merge flags over config into what the session should not ask for.
fn plan(command: Option<Commands>, config: &Config, config_path: Option<&Utf8Path>) -> Plan {
    let configured_catalog = config_path.and_then(|p| config.catalog_path(p));
    let configured_sink = config.output.destination.as_deref().and_then(|d| match d {
        "sql" => Some(SinkChoice::Sql),
        "excel" => Some(SinkChoice::Excel),
        other => {
            warn!(destination = other, "ignoring unknown output destination in config");
            None
        }
    });

    let mut defaults = SessionDefaults {
        database: config.catalog.database.clone(),
        sink: configured_sink,
        ..Default::default()
    };

    let (mode, workbook, catalog_args) = match command {
        None => (None, None, CatalogArgs::default()),
        Some(Commands::Scripts {
            workbook,
            validation,
            to,
            output,
        }) => {
            defaults.validation = validation.validation.map(validation_choice);
            if let Some(to) = to {
                defaults.sink = Some(match to {
                    SinkArg::Sql => SinkChoice::Sql,
                    SinkArg::Excel => SinkChoice::Excel,
                });
            }
            defaults.output = output;
            (Some(Mode::Scripts), Some(workbook), validation.catalog)
        }
        Some(Commands::Validate {
            workbook,
            validation,
        }) => {
            defaults.validation = validation.validation.map(validation_choice);
            (Some(Mode::Validate), Some(workbook), validation.catalog)
        }
        Some(Commands::Template {
            workbook,
            catalog,
            table,
            kind,
            sheet,
        }) => {
            defaults.table = table;
            defaults.kind = kind.map(ScriptKind::from);
            defaults.sheet = sheet;
            (Some(Mode::Template), Some(workbook), catalog)
        }
    };

    if let Some(database) = catalog_args.database {
        defaults.database = Some(database);
    }

    Plan {
        mode,
        workbook,
        catalog: catalog_args.catalog.or(configured_catalog),
        defaults,
    }
}

fn validation_choice(arg: ValidationArg) -> ValidationChoice {
    match arg {
        ValidationArg::Generic => ValidationChoice::Generic,
        ValidationArg::Sql => ValidationChoice::Sql,
    }
}

fn print_report(report: &RunReport) {
    for sheet in &report.sheets {
        match &sheet.outcome {
            SheetOutcome::Valid(scripts) => {
                println!(
                    "{} {}: {} scripts",
                    "VALID".green().bold(),
                    sheet.sheet,
                    scripts.len()
                );
            }
            SheetOutcome::Invalid(result) => {
                println!(
                    "{} {}: {} problems",
                    "INVALID".red().bold(),
                    sheet.sheet,
                    result.violations.len()
                );
                for violation in &result.violations {
                    match violation.coord {
                        Some(coord) => println!(
                            "  {} {} {}",
                            coord.yellow(),
                            violation.message,
                            format!("[{}]", violation.code).dimmed()
                        ),
                        None => println!(
                            "  {} {}",
                            violation.message,
                            format!("[{}]", violation.code).dimmed()
                        ),
                    }
                }
            }
            SheetOutcome::Failed(message) => {
                println!("{} {}: {}", "FAILED".red().bold(), sheet.sheet, message);
            }
        }
    }

    let summary = match report.status() {
        WorkbookStatus::AllValid => "all sheets valid".green().to_string(),
        WorkbookStatus::PartiallyValid => "some sheets invalid".yellow().to_string(),
        WorkbookStatus::NoneValid => "no valid sheets".red().to_string(),
    };
    match report.written.as_str() {
        "" => println!("{summary}"),
        sink => println!("{summary}, wrote {sink}"),
    }
}
