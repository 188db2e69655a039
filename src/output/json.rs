//! JSON report format

use std::io::Write;

use serde::Serialize;

use crate::diff::{DiffResult, EntryStats, Semantics};
use crate::error::Result;
use crate::model::Row;

use super::{OutputFormatter, ReportHeader};

/// Pretty-printed JSON report formatter
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutput;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    file_a: String,
    file_b: String,
    mode: &'static str,
    identical: bool,
    #[serde(flatten)]
    body: JsonBody<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonBody<'a> {
    Literal {
        hunks: Vec<String>,
    },
    Entry {
        stats: &'a EntryStats,
        file1_only: &'a [Row],
        file2_only: &'a [Row],
    },
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        diff: &DiffResult,
        header: &ReportHeader,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let (mode, body) = match diff {
            DiffResult::Literal(literal) => (
                "literal",
                JsonBody::Literal {
                    hunks: literal.to_lines(),
                },
            ),
            DiffResult::Entry(entry) => (
                match entry.semantics {
                    Semantics::Set => "entry",
                    Semantics::Multiset => "multiset",
                },
                JsonBody::Entry {
                    stats: &entry.stats,
                    file1_only: &entry.file1_only,
                    file2_only: &entry.file2_only,
                },
            ),
        };

        let report = JsonReport {
            generated: header.generated.to_rfc3339(),
            file_a: header.source_a.display().to_string(),
            file_b: header.source_b.display().to_string(),
            mode,
            identical: !diff.has_changes(),
            body,
        };

        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;

        Ok(())
    }
}
