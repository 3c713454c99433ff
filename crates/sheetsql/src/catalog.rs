//! The live-database catalog the validator checks templates against.
//!
//! [`CatalogSource`] is the seam: anything that can list databases, tables
//! and per-column metadata. [`SnapshotCatalog`] serves a JSON snapshot of
//! that metadata, so validation works without a database connection.

use camino::Utf8Path;
use facet::Facet;
use sheetsql_template::ScriptKind;
use tracing::debug;

use crate::{Error, Result};

/// One column of a database table.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ColumnMetadata {
    pub name: String,
    /// Base SQL type, e.g. `varchar`, `int`.
    #[facet(rename = "type")]
    pub sql_type: String,
    #[facet(default)]
    pub nullable: bool,
    /// Auto-generated by the database.
    #[facet(default)]
    pub identity: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            identity: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// How the include flag of this column is constrained for `kind`.
    pub fn include_policy(&self, kind: ScriptKind) -> IncludePolicy {
        if !kind.uses_include() {
            return IncludePolicy::Optional;
        }
        if self.identity {
            if kind == ScriptKind::Select {
                IncludePolicy::Optional
            } else {
                IncludePolicy::Forbidden
            }
        } else if !self.nullable && kind == ScriptKind::Insert {
            IncludePolicy::Required
        } else {
            IncludePolicy::Optional
        }
    }
}

/// Constraint on a column's include flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludePolicy {
    /// Must be included: non-nullable, non-identity, insert.
    Required,
    /// Must not be included: identity columns outside select.
    Forbidden,
    Optional,
}

/// Source of database, table and column metadata.
pub trait CatalogSource {
    fn list_databases(&self) -> Result<Vec<String>>;

    fn list_tables(&self, database: &str) -> Result<Vec<String>>;

    /// Columns of `table` in `database`, in table order.
    fn column_metadata(&self, database: &str, table: &str) -> Result<Vec<ColumnMetadata>>;
}

/// A catalog snapshot file.
///
/// ```json
/// {
///   "server": "plant-sql",
///   "databases": [
///     { "name": "Plant", "tables": [
///       { "name": "IOChannels", "columns": [
///         { "name": "Id", "type": "int", "identity": true },
///         { "name": "Name", "type": "varchar" }
///       ] }
///     ] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Facet)]
pub struct SnapshotCatalog {
    #[facet(default)]
    pub server: Option<String>,
    #[facet(default)]
    pub databases: Vec<DatabaseSnapshot>,
}

#[derive(Debug, Clone, Default, Facet)]
pub struct DatabaseSnapshot {
    pub name: String,
    #[facet(default)]
    pub tables: Vec<TableSnapshot>,
}

#[derive(Debug, Clone, Default, Facet)]
pub struct TableSnapshot {
    pub name: String,
    #[facet(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl SnapshotCatalog {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::from_json(&content).map_err(|message| Error::CatalogParse {
            path: path.to_owned(),
            message,
        })?;
        debug!(
            path = %path,
            databases = catalog.databases.len(),
            "loaded catalog snapshot"
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        facet_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Add (or extend) a table; used to build catalogs in code.
    pub fn with_table(
        mut self,
        database: &str,
        table: &str,
        columns: Vec<ColumnMetadata>,
    ) -> Self {
        let db = match self.databases.iter().position(|d| d.name == database) {
            Some(idx) => &mut self.databases[idx],
            None => {
                self.databases.push(DatabaseSnapshot {
                    name: database.to_string(),
                    tables: Vec::new(),
                });
                let last = self.databases.len() - 1;
                &mut self.databases[last]
            }
        };
        db.tables.push(TableSnapshot {
            name: table.to_string(),
            columns,
        });
        self
    }

    fn database(&self, name: &str) -> Result<&DatabaseSnapshot> {
        self.databases
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::UnknownDatabase(name.to_string()))
    }
}

impl CatalogSource for SnapshotCatalog {
    fn list_databases(&self) -> Result<Vec<String>> {
        Ok(self.databases.iter().map(|d| d.name.clone()).collect())
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        Ok(self
            .database(database)?
            .tables
            .iter()
            .map(|t| t.name.clone())
            .collect())
    }

    fn column_metadata(&self, database: &str, table: &str) -> Result<Vec<ColumnMetadata>> {
        self.database(database)?
            .tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| Error::UnknownTable {
                database: database.to_string(),
                table: table.to_string(),
            })
    }
}

/// One database of a catalog, with its table list fetched up front.
pub struct CatalogView<'a> {
    source: &'a dyn CatalogSource,
    database: String,
    tables: Vec<String>,
}

impl<'a> CatalogView<'a> {
    pub fn open(source: &'a dyn CatalogSource, database: &str) -> Result<Self> {
        let tables = source.list_tables(database)?;
        debug!(database, tables = tables.len(), "opened catalog view");
        Ok(Self {
            source,
            database: database.to_string(),
            tables,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }

    pub fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        self.source.column_metadata(&self.database, table)
    }
}
