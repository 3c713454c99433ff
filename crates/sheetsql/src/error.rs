use camino::Utf8PathBuf;
use sheetsql_template::CoordError;
use thiserror::Error;

/// Failures at the boundary: files, the catalog, the user.
///
/// Bad cells are never errors; the validator reports them as
/// [`Violation`](crate::Violation)s instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read or write CSV {path}: {source}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("catalog snapshot {path} is invalid: {message}")]
    CatalogParse { path: Utf8PathBuf, message: String },

    #[error("SQL-backed validation needs a catalog, but none is configured")]
    NoCatalog,

    #[error("database '{0}' not found in catalog")]
    UnknownDatabase(String),

    #[error("table '{table}' not found in database '{database}'")]
    UnknownTable { database: String, table: String },

    #[error("worksheet '{0}' already exists")]
    SheetExists(String),

    #[error("script kind '{0}' is not one of insert, update, delete, select")]
    UnknownScriptKind(String),

    #[error("{path} holds {sheets} worksheets and cannot be saved as a single CSV file")]
    SingleSheetFile { path: Utf8PathBuf, sheets: usize },

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("aborted by user")]
    Aborted,
}

impl Error {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<Utf8PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Error::Csv { source, .. } => matches!(
                source.kind(),
                csv::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::NotFound
            ),
            _ => false,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
