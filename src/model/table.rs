//! Table and Row data structures

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A row: an ordered sequence of field strings
///
/// Equality, hashing and ordering are field-by-field, so rows sort
/// lexicographically over their fields. Rows with differing field counts
/// are valid and simply compare as different sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Serialize the row to a single line, joining fields without re-quoting
    pub fn to_line(&self, delimiter: u8) -> String {
        let mut sep = [0u8; 4];
        let sep = char::from(delimiter).encode_utf8(&mut sep);
        self.fields.join(sep)
    }

    /// Get a field by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A table: the ordered rows read from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Where the rows were read from
    pub source: PathBuf,
    /// All rows, in file order
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(source: impl Into<PathBuf>, rows: Vec<Row>) -> Self {
        Self {
            source: source.into(),
            rows,
        }
    }

    /// Build a table from string literals, mostly useful in tests
    pub fn from_records<R, S>(source: impl Into<PathBuf>, records: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = records.into_iter().map(|r| r.into_iter().collect()).collect();
        Self::new(source, rows)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Serialize every row to a line
    pub fn to_lines(&self, delimiter: u8) -> Vec<String> {
        self.rows.iter().map(|r| r.to_line(delimiter)).collect()
    }
}
