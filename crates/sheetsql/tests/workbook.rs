//! Whole-workbook runs through the orchestrator.

use camino::{Utf8Path, Utf8PathBuf};
use sheetsql::*;
use sheetsql_template::{Workbook, Worksheet};

fn sheet(name: &str, rows: &[&[&str]]) -> Worksheet {
    Worksheet::with_rows(
        name,
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

fn valid_update() -> Worksheet {
    sheet(
        "Channels",
        &[
            &["IOChannels", "update"],
            &["Id", "Name"],
            &["int", "varchar(50)"],
            &["", "include"],
            &["where", ""],
            &["7", "Widget"],
            &["8", "Gadget"],
            &["", ""],
        ],
    )
}

fn invalid_delete() -> Worksheet {
    sheet(
        "Broken",
        &[
            &["IOChannels", "delete"],
            &["Id"],
            &["int"],
            &[""],
            &["where"],
            &[""],
            &["9"],
        ],
    )
}

fn control() -> Worksheet {
    sheet("configuration", &[&["server", "plant-sql"]])
}

fn catalog() -> SnapshotCatalog {
    SnapshotCatalog::default().with_table(
        "Plant",
        "IOChannels",
        vec![
            ColumnMetadata::new("Id", "int").identity(),
            ColumnMetadata::new("Name", "varchar"),
        ],
    )
}

fn temp_dir(name: &str) -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("sheetsql-workbook-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    Utf8PathBuf::from_path_buf(dir).unwrap()
}

const BOOK: &str = "book";

#[test]
fn test_control_sheet_is_skipped() {
    let mut store = MemoryStore::new()
        .with_workbook(BOOK, Workbook::new(vec![control(), valid_update()]));
    let report = Orchestrator::new(&mut store)
        .validate_workbook(Utf8Path::new(BOOK), &Validation::Generic)
        .unwrap();

    let names: Vec<_> = report.sheets.iter().map(|s| s.sheet.as_str()).collect();
    assert_eq!(names, ["Channels"]);
    assert_eq!(report.status(), WorkbookStatus::AllValid);
    assert_eq!(report.written, WrittenSink::Nothing);
}

#[test]
fn test_one_invalid_sheet_does_not_stop_the_others() {
    let mut store = MemoryStore::new().with_workbook(
        BOOK,
        Workbook::new(vec![invalid_delete(), valid_update()]),
    );
    let report = Orchestrator::new(&mut store)
        .validate_workbook(Utf8Path::new(BOOK), &Validation::Generic)
        .unwrap();

    assert_eq!(report.status(), WorkbookStatus::PartiallyValid);
    match &report.sheets[0].outcome {
        SheetOutcome::Invalid(result) => {
            assert_eq!(result.codes(), ["missing-value"]);
            assert_eq!(result.violations[0].to_string(), "A6: Missing value for column 'Id'");
        }
        other => panic!("expected an invalid sheet, got {other:?}"),
    }
    let valid: Vec<_> = report.valid_sheets().map(|(name, s)| (name, s.len())).collect();
    assert_eq!(valid, [("Channels", 2)]);
}

#[test]
fn test_scripts_to_sql_file() {
    let dir = temp_dir("sql-file");
    let out = dir.join("out.sql");
    let mut store = MemoryStore::new().with_workbook(
        BOOK,
        Workbook::new(vec![valid_update(), invalid_delete(), control()]),
    );

    let report = Orchestrator::new(&mut store)
        .write_scripts(
            Utf8Path::new(BOOK),
            &Validation::Generic,
            &Destination::SqlFile(out.clone()),
        )
        .unwrap();

    assert_eq!(report.written.as_str(), "SQL");
    insta::assert_snapshot!(std::fs::read_to_string(&out).unwrap().trim_end(), @r"
    UPDATE IOChannels SET Name = 'Widget' WHERE Id = 7;
    UPDATE IOChannels SET Name = 'Gadget' WHERE Id = 8;
    ");
}

#[test]
fn test_scripts_written_back_into_workbook() {
    let mut store =
        MemoryStore::new().with_workbook(BOOK, Workbook::new(vec![valid_update(), invalid_delete()]));

    let report = Orchestrator::new(&mut store)
        .write_scripts(
            Utf8Path::new(BOOK),
            &Validation::Generic,
            &Destination::Workbook("book-out".into()),
        )
        .unwrap();
    assert_eq!(report.written.as_str(), "Excel");

    let saved = store.workbook(Utf8Path::new("book-out")).unwrap();
    let channels = saved.sheet("Channels").unwrap();
    assert_eq!(channels.cell(2, 1), "Scripts");
    assert_eq!(
        channels.cell(2, 5),
        "UPDATE IOChannels SET Name = 'Widget' WHERE Id = 7;"
    );
    assert_eq!(
        channels.cell(2, 6),
        "UPDATE IOChannels SET Name = 'Gadget' WHERE Id = 8;"
    );
    assert_eq!(channels.cell(2, 7), "");
    assert_eq!(channels.cell(1, 5), "Widget");

    // Invalid sheets are saved untouched.
    assert_eq!(saved.sheet("Broken").unwrap(), &invalid_delete());
}

#[test]
fn test_nothing_written_when_no_sheet_is_valid() {
    let dir = temp_dir("nothing");
    let out = dir.join("out.sql");
    let mut store = MemoryStore::new().with_workbook(BOOK, Workbook::new(vec![invalid_delete()]));

    let report = Orchestrator::new(&mut store)
        .write_scripts(
            Utf8Path::new(BOOK),
            &Validation::Generic,
            &Destination::SqlFile(out.clone()),
        )
        .unwrap();

    assert_eq!(report.status(), WorkbookStatus::NoneValid);
    assert_eq!(report.written, WrittenSink::Nothing);
    assert_eq!(report.written.as_str(), "");
    assert!(!out.exists());
}

#[test]
fn test_catalog_validation() {
    let catalog = catalog();
    let mut identity = valid_update();
    identity.rows[3][0] = "include".into();

    let mut store = MemoryStore::new().with_workbook(
        BOOK,
        Workbook::new(vec![valid_update(), {
            identity.name = "Identity".into();
            identity
        }]),
    );
    let report = Orchestrator::new(&mut store)
        .with_catalog(&catalog)
        .validate_workbook(
            Utf8Path::new(BOOK),
            &Validation::Catalog {
                database: "Plant".into(),
            },
        )
        .unwrap();

    assert!(report.sheets[0].is_valid());
    match &report.sheets[1].outcome {
        SheetOutcome::Invalid(result) => assert_eq!(result.codes(), ["identity-included"]),
        other => panic!("expected an invalid sheet, got {other:?}"),
    }
}

#[test]
fn test_catalog_failure_is_reported_per_sheet() {
    struct Flaky;
    impl CatalogSource for Flaky {
        fn list_databases(&self) -> Result<Vec<String>> {
            Ok(vec!["Plant".into()])
        }
        fn list_tables(&self, _: &str) -> Result<Vec<String>> {
            Ok(vec!["IOChannels".into(), "Other".into()])
        }
        fn column_metadata(&self, _: &str, table: &str) -> Result<Vec<ColumnMetadata>> {
            if table == "Other" {
                return Err(Error::Aborted);
            }
            Ok(vec![
                ColumnMetadata::new("Id", "int").identity(),
                ColumnMetadata::new("Name", "varchar"),
            ])
        }
    }

    let mut other = valid_update();
    other.name = "Other".into();
    other.rows[0][0] = "Other".into();

    let mut store =
        MemoryStore::new().with_workbook(BOOK, Workbook::new(vec![other, valid_update()]));
    let report = Orchestrator::new(&mut store)
        .with_catalog(&Flaky)
        .validate_workbook(
            Utf8Path::new(BOOK),
            &Validation::Catalog {
                database: "Plant".into(),
            },
        )
        .unwrap();

    assert!(matches!(report.sheets[0].outcome, SheetOutcome::Failed(_)));
    assert!(report.sheets[1].is_valid());
    assert_eq!(report.status(), WorkbookStatus::PartiallyValid);
}

#[test]
fn test_unknown_database_is_fatal() {
    let catalog = catalog();
    let mut store = MemoryStore::new().with_workbook(BOOK, Workbook::new(vec![valid_update()]));
    let err = Orchestrator::new(&mut store)
        .with_catalog(&catalog)
        .validate_workbook(
            Utf8Path::new(BOOK),
            &Validation::Catalog {
                database: "Nope".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnknownDatabase(_)));
}

#[test]
fn test_catalog_validation_without_catalog_is_fatal() {
    let mut store = MemoryStore::new().with_workbook(BOOK, Workbook::new(vec![valid_update()]));
    let err = Orchestrator::new(&mut store)
        .validate_workbook(
            Utf8Path::new(BOOK),
            &Validation::Catalog {
                database: "Plant".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoCatalog));
}

#[test]
fn test_missing_workbook_is_fatal() {
    let mut store = MemoryStore::new();
    let err = Orchestrator::new(&mut store)
        .validate_workbook(Utf8Path::new("nope"), &Validation::Generic)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_template_round_trip_through_csv() {
    let dir = temp_dir("template");
    let book = dir.join("book");
    let catalog = catalog();

    let mut builder = TemplateBuilder::new(
        "IOChannels",
        sheetsql_template::ScriptKind::Update,
        catalog.column_metadata("Plant", "IOChannels").unwrap(),
    );
    builder.set_include(1, true);
    builder.set_where(0, true);

    let mut store = CsvStore::new();
    Orchestrator::new(&mut store)
        .write_template(&book, "Channels", &builder)
        .unwrap();
    assert!(book.join("Channels.csv").exists());

    // Fill in a data row the way a user would.
    let mut filled = std::fs::read_to_string(book.join("Channels.csv")).unwrap();
    filled.push_str("7,Widget\n");
    std::fs::write(book.join("Channels.csv"), filled).unwrap();

    let mut store = CsvStore::new();
    let report = Orchestrator::new(&mut store)
        .with_catalog(&catalog)
        .write_scripts(
            &book,
            &Validation::Catalog {
                database: "Plant".into(),
            },
            &Destination::Workbook(book.clone()),
        )
        .unwrap();
    assert_eq!(report.status(), WorkbookStatus::AllValid);

    let saved = CsvStore::new().open_workbook(&book).unwrap();
    let channels = saved.sheet("Channels").unwrap();
    assert_eq!(channels.cell(2, 1), "Scripts");
    assert_eq!(
        channels.cell(2, 5),
        "UPDATE IOChannels SET Name = 'Widget' WHERE Id = 7;"
    );

    // A second template with the same sheet name is refused.
    let err = Orchestrator::new(&mut CsvStore::new())
        .write_template(&book, "Channels", &builder)
        .unwrap_err();
    assert!(matches!(err, Error::SheetExists(name) if name == "Channels"));
}

#[test]
fn test_new_template_workbook_after_another_was_opened() {
    let catalog = catalog();
    let builder = TemplateBuilder::new(
        "IOChannels",
        sheetsql_template::ScriptKind::Delete,
        catalog.column_metadata("Plant", "IOChannels").unwrap(),
    );

    let mut store = MemoryStore::new()
        .with_workbook(BOOK, Workbook::new(vec![control(), valid_update()]));
    let mut orchestrator = Orchestrator::new(&mut store);
    orchestrator
        .validate_workbook(Utf8Path::new(BOOK), &Validation::Generic)
        .unwrap();
    orchestrator
        .write_template(Utf8Path::new("fresh"), "Channels", &builder)
        .unwrap();

    let fresh = store.workbook(Utf8Path::new("fresh")).unwrap();
    let names: Vec<_> = fresh.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Channels"]);
    assert_eq!(fresh.sheet("Channels").unwrap().cell(1, 0), "delete");
}
