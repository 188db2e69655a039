//! Error types for csvdiff operations

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {} at line {line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Unsupported file type for {}: expected .{expected}, found {}", .path.display(), display_ext(.actual))]
    UnsupportedType {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Unknown mode: {mode} (expected literal, entry or multiset)")]
    UnknownMode { mode: String },

    #[error("Unknown report format: {format} (expected text or json)")]
    UnknownFormat { format: String },

    #[error("Output directory {} is unavailable: {reason}", .path.display())]
    OutputUnavailable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiffError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn output_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OutputUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn display_ext(ext: &str) -> String {
    if ext.is_empty() {
        "no extension".to_string()
    } else {
        format!(".{}", ext)
    }
}
