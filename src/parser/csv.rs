//! CSV file parser

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{DiffError, Result};
use crate::model::{Row, Table};

use super::{Parser, SUPPORTED_EXTENSION};

const QUOTE: char = '"';

/// Parser for RFC 4180 style CSV files
pub struct CsvParser;

impl CsvParser {
    /// Read `path` into a table using the configured delimiter
    pub fn read(path: &Path, delimiter: u8) -> Result<Table> {
        let text = fs::read_to_string(path).map_err(|e| DiffError::read(path, e))?;
        let rows = parse_str(&text, delimiter).map_err(|(line, message)| {
            DiffError::format(path, line, message)
        })?;

        log::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Table::new(path, rows))
    }
}

impl Parser for CsvParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        Self::read(path, config.delimiter)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION)
    }
}

/// Parse decoded CSV text into rows
///
/// Every physical line outside a quoted field yields one row, so a blank
/// line becomes a row with no fields. Errors carry the 1-based line number
/// and a description.
pub fn parse_str(text: &str, delimiter: u8) -> std::result::Result<Vec<Row>, (usize, String)> {
    let layout = scan_records(text, char::from(delimiter))
        .map_err(|line| (line, "unterminated quoted field".to_string()))?;

    // The csv crate skips blank lines, so they are put back from the layout
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut records = csv_reader.records();

    let mut rows: Vec<Row> = Vec::with_capacity(layout.len());
    for kind in layout {
        match kind {
            RecordKind::Blank => rows.push(Row::new(Vec::new())),
            RecordKind::Data => {
                let Some(result) = records.next() else {
                    break;
                };
                let record = result.map_err(|e| {
                    let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                    (line, e.to_string())
                })?;
                rows.push(record.iter().collect());
            }
        }
    }

    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Blank,
    Data,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Kind of every record in `text`, in order
///
/// Records end at `\n`, `\r` or `\r\n` outside quoted fields. Fails with the
/// line on which a quoted field opens without ever being closed.
fn scan_records(text: &str, delimiter: char) -> std::result::Result<Vec<RecordKind>, usize> {
    let mut layout = Vec::new();
    let mut state = QuoteState::FieldStart;
    let mut has_content = false;
    let mut line = 1;
    let mut opened_on = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let terminator = c == '\n' || c == '\r';
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }

        state = match (state, c) {
            (QuoteState::Quoted, QUOTE) => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::FieldStart, QUOTE) => {
                opened_on = line;
                has_content = true;
                QuoteState::Quoted
            }
            // Doubled quote inside a quoted field
            (QuoteState::QuoteInQuoted, QUOTE) => QuoteState::Quoted,
            _ if terminator => {
                layout.push(if has_content {
                    RecordKind::Data
                } else {
                    RecordKind::Blank
                });
                has_content = false;
                QuoteState::FieldStart
            }
            (_, c) if c == delimiter => {
                has_content = true;
                QuoteState::FieldStart
            }
            _ => {
                has_content = true;
                QuoteState::Unquoted
            }
        };

        if terminator {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(opened_on);
    }
    if has_content {
        layout.push(RecordKind::Data);
    }
    Ok(layout)
}
