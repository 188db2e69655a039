//! Parser layer for reading delimited text files

mod csv;

use std::path::Path;

use crate::config::Config;
use crate::error::{DiffError, Result};
use crate::model::Table;

pub use self::csv::CsvParser;

/// Extension accepted by the comparison engine
pub const SUPPORTED_EXTENSION: &str = "csv";

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for picking a parser based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = extension_of(path);

        self.parsers
            .iter()
            .find(|p| p.supports_extension(&ext))
            .map(|p| p.as_ref())
            .ok_or_else(|| DiffError::UnsupportedType {
                path: path.to_path_buf(),
                expected: SUPPORTED_EXTENSION.to_string(),
                actual: ext,
            })
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let parser = self.get_parser(path)?;
        parser.parse(path, config)
    }
}

/// Extension of `path` without the leading dot, or an empty string
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string()
}

/// Check that both paths carry the same supported extension
///
/// Extensions must match exactly; the supported check itself ignores case.
pub fn check_file_types(a: &Path, b: &Path) -> Result<()> {
    let ext_a = extension_of(a);
    let ext_b = extension_of(b);

    if ext_a != ext_b {
        return Err(DiffError::UnsupportedType {
            path: b.to_path_buf(),
            expected: ext_a,
            actual: ext_b,
        });
    }

    if !ext_a.eq_ignore_ascii_case(SUPPORTED_EXTENSION) {
        return Err(DiffError::UnsupportedType {
            path: a.to_path_buf(),
            expected: SUPPORTED_EXTENSION.to_string(),
            actual: ext_a,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_csv_extensions() {
        assert!(check_file_types(Path::new("a.csv"), Path::new("dir/b.csv")).is_ok());
        assert!(check_file_types(Path::new("a.CSV"), Path::new("b.CSV")).is_ok());
    }

    #[test]
    fn test_mismatched_extensions() {
        match check_file_types(Path::new("a.csv"), Path::new("b.tsv")) {
            Err(DiffError::UnsupportedType { expected, actual, .. }) => {
                assert_eq!(expected, "csv");
                assert_eq!(actual, "tsv");
            }
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
        assert!(check_file_types(Path::new("a.csv"), Path::new("b.CSV")).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        match check_file_types(Path::new("a.txt"), Path::new("b.txt")) {
            Err(DiffError::UnsupportedType { expected, actual, path }) => {
                assert_eq!(expected, "csv");
                assert_eq!(actual, "txt");
                assert_eq!(path, Path::new("a.txt"));
            }
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn test_factory_rejects_unknown_extension() {
        let factory = ParserFactory::new();
        assert!(factory.get_parser(Path::new("a.csv")).is_ok());
        assert!(factory.get_parser(Path::new("a.xlsx")).is_err());
    }
}
