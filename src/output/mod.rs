//! Report formatting for diff results

mod json;
mod text;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{Config, ReportFormat};
use crate::diff::DiffResult;
use crate::error::Result;

pub use json::JsonOutput;
pub use text::TextOutput;

/// Identifies the compared sources and when the report was generated
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub source_a: PathBuf,
    pub source_b: PathBuf,
    pub generated: DateTime<Local>,
}

impl ReportHeader {
    pub fn new(source_a: &Path, source_b: &Path, generated: DateTime<Local>) -> Self {
        Self {
            source_a: absolute(source_a),
            source_b: absolute(source_b),
            generated,
        }
    }

    pub fn generated_display(&self) -> String {
        self.generated.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Absolute form of `path`, without resolving symlinks
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render a diff result to a writer
    fn render(&self, diff: &DiffResult, header: &ReportHeader, writer: &mut dyn Write)
        -> Result<()>;
}

/// Factory for creating report formatters
pub struct OutputFactory;

impl OutputFactory {
    pub fn create(config: &Config) -> Box<dyn OutputFormatter> {
        match config.report_format {
            ReportFormat::Text => Box::new(TextOutput::new(config.max_row_width)),
            ReportFormat::Json => Box::new(JsonOutput),
        }
    }
}

/// Render a report to a string
pub fn format_report(diff: &DiffResult, header: &ReportHeader, config: &Config) -> Result<String> {
    let formatter = OutputFactory::create(config);
    let mut buffer = Vec::new();
    formatter.render(diff, header, &mut buffer)?;
    // Formatters only write UTF-8 text
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
