//! Configuration handling for csvdiff

use std::fmt;
use std::str::FromStr;

use crate::error::DiffError;

/// How two tables are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompareMode {
    /// Line-by-line unified diff of the serialized rows
    #[default]
    Literal,
    /// Distinct-row set comparison with statistics
    Entry,
    /// Entry comparison that keeps duplicate rows
    Multiset,
}

impl CompareMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareMode::Literal => "literal",
            CompareMode::Entry => "entry",
            CompareMode::Multiset => "multiset",
        }
    }

    /// Parse an optional mode string, falling back to literal when absent
    pub fn from_optional(mode: Option<&str>) -> Result<Self, DiffError> {
        match mode {
            Some(m) => m.parse(),
            None => Ok(CompareMode::default()),
        }
    }
}

impl FromStr for CompareMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(CompareMode::Literal),
            "entry" => Ok(CompareMode::Entry),
            "multiset" => Ok(CompareMode::Multiset),
            _ => Err(DiffError::UnknownMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of the persisted report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// File extension used for report files
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "diff",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(DiffError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Configuration for comparison and reporting
#[derive(Debug, Clone)]
pub struct Config {
    /// Comparison mode
    pub mode: CompareMode,
    /// Field delimiter used for reading and for serializing rows to lines
    pub delimiter: u8,
    /// Unchanged lines shown around each change in literal mode
    pub context_lines: usize,
    /// Attach modification times to the literal diff labels
    pub include_timestamps: bool,
    /// Maximum rendered width of a single row in entry reports
    pub max_row_width: Option<usize>,
    /// Report format
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: CompareMode::default(),
            delimiter: b',',
            context_lines: 3,
            include_timestamps: true,
            max_row_width: None,
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config for the given mode
    pub fn new(mode: CompareMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the number of context lines around literal changes
    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Truncate rendered rows longer than `width` characters
    pub fn with_max_row_width(mut self, width: usize) -> Self {
        self.max_row_width = Some(width);
        self
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }
}
