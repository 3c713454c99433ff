use sheetsql_template::{Template, Worksheet};

use super::*;
use crate::{CatalogView, ColumnMetadata, SnapshotCatalog};

fn template(rows: &[&[&str]]) -> Template {
    let sheet = Worksheet::with_rows(
        "Sheet1",
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    );
    Template::from_worksheet(&sheet)
}

fn catalog() -> SnapshotCatalog {
    SnapshotCatalog::default().with_table(
        "Plant",
        "IOChannels",
        vec![
            ColumnMetadata::new("Id", "int").identity(),
            ColumnMetadata::new("IOServersId", "int"),
            ColumnMetadata::new("Name", "varchar"),
            ColumnMetadata::new("Notes", "varchar").nullable(),
        ],
    )
}

fn with_catalog(t: &Template) -> ValidationResult {
    let catalog = catalog();
    let view = CatalogView::open(&catalog, "Plant").unwrap();
    validate_with_catalog(t, &view).unwrap()
}

fn coords(result: &ValidationResult) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|v| v.coord.map(|c| c.to_string()).unwrap_or_default())
        .collect()
}

#[test]
fn test_valid_insert() {
    let t = template(&[
        &["IOChannels", "insert", "", ""],
        &["Id", "IOServersId", "Name", "Notes"],
        &["int", "int", "varchar(50)", "varchar(max)"],
        &["", "include", "include", ""],
        &["", "", "", ""],
        &["1", "3", "Pump", ""],
        &["", "", "", ""],
    ]);
    assert!(validate_generic(&t).is_valid());
    assert!(with_catalog(&t).is_valid());
}

#[test]
fn test_structural_violations() {
    let t = template(&[
        &["", "upsert", ""],
        &["Id", "", "Name"],
        &["int", "integer", ""],
        &["Include", "include", "include"],
        &["", "yes", ""],
    ]);
    let result = validate_generic(&t);
    assert_eq!(
        result.codes(),
        [
            "missing-table-name",
            "invalid-script-kind",
            "invalid-include-flag",
            "invalid-where-flag",
            "missing-column-name",
            "unknown-type",
            "missing-column-type",
        ]
    );
    assert_eq!(coords(&result), ["A1", "B1", "A4", "B5", "B2", "B3", "C3"]);
    assert!(
        result
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::Structural)
    );
}

#[test]
fn test_blank_script_kind_message() {
    let t = template(&[&["T"]]);
    let result = validate_generic(&t);
    assert_eq!(result.codes(), ["invalid-script-kind"]);
    insta::assert_snapshot!(
        result.violations[0].to_string(),
        @"B1: Script type is blank. Expected one of: insert, update, delete, select"
    );
}

#[test]
fn test_unflagged_columns_are_not_checked() {
    let t = template(&[
        &["T", "delete", ""],
        &["Id", "", "Whatever"],
        &["int", "???", ""],
        &["", "", ""],
        &["where", "", ""],
        &["7", "", ""],
    ]);
    assert!(validate_generic(&t).is_valid());
}

#[test]
fn test_missing_values() {
    let t = template(&[
        &["T", "update", ""],
        &["Id", "Name", "Notes"],
        &["int", "varchar", "varchar"],
        &["", "include", ""],
        &["where", "", ""],
        &["1", "", "ignored"],
        &["", "Valve", ""],
        &["3", "Gauge", ""],
    ]);
    let result = validate_generic(&t);
    assert_eq!(result.codes(), ["missing-value", "missing-value"]);
    assert_eq!(coords(&result), ["B6", "A7"]);
    assert!(
        result
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::DataCompleteness)
    );
}

#[test]
fn test_blank_row_in_the_middle_is_checked() {
    let t = template(&[
        &["T", "delete"],
        &["Id"],
        &["int"],
        &[""],
        &["where"],
        &["1"],
        &[""],
        &["3"],
    ]);
    assert_eq!(coords(&validate_generic(&t)), ["A7"]);
}

#[test]
fn test_unknown_table_stops_catalog_checks() {
    let t = template(&[
        &["Nope", "insert"],
        &["Ghost"],
        &["int"],
        &["include"],
        &[""],
        &[""],
        &["1"],
    ]);
    let result = with_catalog(&t);
    assert_eq!(result.codes(), ["unknown-table"]);
    assert_eq!(result.violations[0].kind, ViolationKind::CatalogMismatch);
}

#[test]
fn test_unknown_column_and_type_mismatch() {
    let t = template(&[
        &["IOChannels", "select", ""],
        &["Name", "Ghost", "IOServersId"],
        &["nvarchar(20)", "int", "int"],
        &["include", "include", ""],
        &["", "", "where"],
        &["x", "1", "3"],
    ]);
    let result = with_catalog(&t);
    assert_eq!(result.codes(), ["unknown-column", "type-mismatch"]);
    assert_eq!(coords(&result), ["B2", "A3"]);
    insta::assert_snapshot!(
        result.violations[1].to_string(),
        @"A3: Column 'Name' is declared 'nvarchar' but the table has 'varchar'"
    );
}

#[test]
fn test_required_column_for_insert() {
    let t = template(&[
        &["IOChannels", "insert", ""],
        &["IOServersId", "Name", "Notes"],
        &["int", "varchar", "varchar"],
        &["include", "", "include"],
        &["", "", ""],
        &["3", "", "n"],
    ]);
    let result = with_catalog(&t);
    assert_eq!(result.codes(), ["missing-required-column"]);
    assert_eq!(coords(&result), ["B4"]);
}

#[test]
fn test_required_column_absent_from_sheet() {
    let t = template(&[
        &["IOChannels", "insert"],
        &["IOServersId"],
        &["int"],
        &["include"],
        &[""],
        &["3"],
    ]);
    let result = with_catalog(&t);
    assert_eq!(result.codes(), ["missing-required-column"]);
    assert_eq!(result.violations[0].coord, None);
    insta::assert_snapshot!(
        result.violations[0].to_string(),
        @"Column 'Name' is not nullable and must be included in insert scripts"
    );
}

#[test]
fn test_required_columns_only_apply_to_insert() {
    let t = template(&[
        &["IOChannels", "update"],
        &["Id", "Notes"],
        &["int", "varchar"],
        &["", "include"],
        &["where", ""],
        &["1", "n"],
    ]);
    assert!(with_catalog(&t).is_valid());
}

#[test]
fn test_identity_included() {
    for kind in ["insert", "update"] {
        let t = template(&[
            &["IOChannels", kind, "", ""],
            &["Id", "IOServersId", "Name", "Notes"],
            &["int", "int", "varchar", "varchar"],
            &["include", "include", "include", ""],
            &["", "", "", "where"],
            &["1", "3", "Pump", "n"],
        ]);
        let result = with_catalog(&t);
        assert_eq!(result.codes(), ["identity-included"], "{kind}");
        assert_eq!(coords(&result), ["A4"]);
    }
}

#[test]
fn test_identity_allowed_in_select() {
    let t = template(&[
        &["IOChannels", "select"],
        &["Id", "Name"],
        &["int", "varchar(50)"],
        &["include", ""],
        &["", "where"],
        &["1", "Pump"],
    ]);
    assert!(with_catalog(&t).is_valid());
}

#[test]
fn test_catalog_checks_keep_structural_results() {
    let t = template(&[
        &["IOChannels", "delete"],
        &["Id"],
        &["int"],
        &[""],
        &["WHERE"],
        &["1"],
    ]);
    let result = with_catalog(&t);
    assert_eq!(result.codes(), ["invalid-where-flag"]);
}

#[test]
fn test_unreadable_catalog_is_an_error() {
    struct Broken;
    impl crate::CatalogSource for Broken {
        fn list_databases(&self) -> crate::Result<Vec<String>> {
            Ok(vec!["Plant".into()])
        }
        fn list_tables(&self, _: &str) -> crate::Result<Vec<String>> {
            Ok(vec!["T".into()])
        }
        fn column_metadata(&self, _: &str, table: &str) -> crate::Result<Vec<ColumnMetadata>> {
            Err(crate::Error::UnknownTable {
                database: "Plant".into(),
                table: table.into(),
            })
        }
    }

    let t = template(&[&["T", "delete"], &["Id"], &["int"], &[""], &["where"]]);
    let view = CatalogView::open(&Broken, "Plant").unwrap();
    assert!(validate_with_catalog(&t, &view).is_err());
}

#[test]
fn test_too_many_columns_is_located() {
    let width = 49;
    let row = |cell: &str| vec![cell.to_string(); width];
    let mut rows = vec![row(""); 6];
    rows[0][0] = "T".into();
    rows[0][1] = "delete".into();
    rows[1] = (0..width).map(|i| format!("c{i}")).collect();
    rows[2] = row("int");
    rows[4][0] = "where".into();
    rows[5] = row("1");
    let t = Template::from_worksheet(&Worksheet::with_rows("wide", rows));

    let result = validate_generic(&t);
    assert_eq!(result.codes(), ["too-many-columns"]);
    assert_eq!(coords(&result), ["AW2"]);
    insta::assert_snapshot!(
        &result.violations[0].message,
        @"Template has 49 columns; columns past AV leave no room for scripts"
    );
}

#[test]
fn test_widest_template_is_valid() {
    let width = 48;
    let row = |cell: &str| vec![cell.to_string(); width];
    let mut rows = vec![row(""); 6];
    rows[0][0] = "T".into();
    rows[0][1] = "delete".into();
    rows[1] = (0..width).map(|i| format!("c{i}")).collect();
    rows[2] = row("int");
    rows[4][0] = "where".into();
    rows[5] = row("1");
    let t = Template::from_worksheet(&Worksheet::with_rows("wide", rows));
    assert!(validate_generic(&t).is_valid());
}
