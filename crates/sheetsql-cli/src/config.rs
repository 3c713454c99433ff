//! Configuration file handling for sheetsql.
//!
//! Looks for `.config/sheetsql.styx` in the current directory or any parent
//! directory:
//!
//! ```styx
//! catalog {
//!     path catalog.json
//!     server plant-sql
//!     database Plant
//! }
//! output {
//!     destination sql
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use facet::Facet;
use thiserror::Error;

#[derive(Debug, Default, Facet)]
pub struct Config {
    #[facet(default)]
    pub catalog: CatalogConfig,
    #[facet(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Facet)]
pub struct CatalogConfig {
    /// Catalog snapshot, relative to the directory holding `.config/`.
    #[facet(default)]
    pub path: Option<String>,
    /// Display name of the database server the snapshot was taken from.
    #[facet(default)]
    pub server: Option<String>,
    #[facet(default)]
    pub database: Option<String>,
}

#[derive(Debug, Default, Facet)]
pub struct OutputConfig {
    /// `sql` or `excel`.
    #[facet(default)]
    pub destination: Option<String>,
}

impl Config {
    /// The catalog snapshot path, resolved against the project root.
    pub fn catalog_path(&self, config_path: &Utf8Path) -> Option<Utf8PathBuf> {
        let path = Utf8Path::new(self.catalog.path.as_deref()?);
        let root = config_path
            .parent()
            .and_then(Utf8Path::parent)
            .unwrap_or(Utf8Path::new("."));
        Some(root.join(path))
    }
}

/// Load configuration from `.config/sheetsql.styx`, searching up the
/// directory tree.
pub fn load() -> Result<(Config, Utf8PathBuf), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| ConfigError::Io(format!("{} is not valid UTF-8", p.display())))?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Utf8Path) -> Result<(Config, Utf8PathBuf), ConfigError> {
    let config_path = find_config_file(start)?;
    let content =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(e.to_string()))?;

    let config: Config =
        facet_styx::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok((config, config_path))
}

/// Find `.config/sheetsql.styx` by searching up the directory tree.
fn find_config_file(start: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".config/sheetsql.styx");
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.config/sheetsql.styx` found in any parent directory
    #[error("No .config/sheetsql.styx found in current directory or any parent")]
    NotFound,
    /// I/O error reading the file
    #[error("Failed to read .config/sheetsql.styx: {0}")]
    Io(String),
    /// Parse error in the Styx file
    #[error("Failed to parse .config/sheetsql.styx: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project(name: &str) -> Utf8PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sheetsql-config-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join(".config")).unwrap();
        std::fs::create_dir_all(dir.join("sheets/nested")).unwrap();
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn test_found_from_nested_directory() {
        let root = temp_project("nested");
        std::fs::write(
            root.join(".config/sheetsql.styx"),
            "catalog {\n    path catalog.json\n    database Plant\n}\noutput {\n    destination excel\n}\n",
        )
        .unwrap();

        let (config, path) = load_from(&root.join("sheets/nested")).unwrap();
        assert_eq!(path, root.join(".config/sheetsql.styx"));
        assert_eq!(config.catalog.database.as_deref(), Some("Plant"));
        assert_eq!(config.catalog.server, None);
        assert_eq!(config.output.destination.as_deref(), Some("excel"));
        assert_eq!(
            config.catalog_path(&path),
            Some(root.join("catalog.json"))
        );
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let root = temp_project("empty");
        std::fs::write(root.join(".config/sheetsql.styx"), "").unwrap();
        let (config, path) = load_from(&root).unwrap();
        assert!(config.catalog.path.is_none());
        assert!(config.catalog_path(&path).is_none());
    }

    #[test]
    fn test_error_messages() {
        insta::assert_snapshot!(
            ConfigError::NotFound,
            @"No .config/sheetsql.styx found in current directory or any parent"
        );
        insta::assert_snapshot!(
            ConfigError::Parse("unexpected end of input".into()),
            @"Failed to parse .config/sheetsql.styx: unexpected end of input"
        );
    }

    #[test]
    fn test_parse_error() {
        let root = temp_project("parse");
        std::fs::write(root.join(".config/sheetsql.styx"), "catalog {\n").unwrap();
        assert!(matches!(load_from(&root), Err(ConfigError::Parse(_))));
    }
}
