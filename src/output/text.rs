//! Plain text report

use std::io::Write;

use crate::diff::{DiffResult, EntryDiff, LiteralDiff, Semantics};
use crate::error::Result;
use crate::model::Row;

use super::{OutputFormatter, ReportHeader};

const WIDE_RULE: usize = 60;
const NARROW_RULE: usize = 40;
const FIELD_SEPARATOR: &str = ", ";
const TRUNCATED_MARKER: &str = " ... [truncated]";

/// Text report with a fixed header and statistics layout
pub struct TextOutput {
    max_row_width: Option<usize>,
}

impl TextOutput {
    pub fn new(max_row_width: Option<usize>) -> Self {
        Self { max_row_width }
    }

    fn write_header(&self, header: &ReportHeader, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "CSV Diff Report")?;
        writeln!(writer, "Generated: {}", header.generated_display())?;
        writeln!(writer, "Tool: csvdiff {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(writer, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(writer, "File A: {}", header.source_a.display())?;
        writeln!(writer, "File B: {}", header.source_b.display())?;
        writeln!(writer, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_literal(&self, diff: &LiteralDiff, writer: &mut dyn Write) -> Result<()> {
        if diff.is_empty() {
            writeln!(writer, "No differences found.")?;
            return Ok(());
        }

        for line in diff.to_lines() {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    fn write_entry(&self, diff: &EntryDiff, writer: &mut dyn Write) -> Result<()> {
        self.write_statistics(diff, writer)?;

        self.write_rows("ROWS ONLY IN FILE A", '-', &diff.file1_only, writer)?;
        self.write_rows("ROWS ONLY IN FILE B", '+', &diff.file2_only, writer)?;

        if !diff.has_changes() {
            writeln!(writer, "No differences found - files are identical.")?;
        }
        Ok(())
    }

    fn write_statistics(&self, diff: &EntryDiff, writer: &mut dyn Write) -> Result<()> {
        let stats = &diff.stats;
        let comparison = match diff.semantics {
            Semantics::Set => "distinct rows",
            Semantics::Multiset => "all rows, duplicates kept",
        };

        writeln!(writer, "STATISTICS:")?;
        writeln!(writer, "  Compared: {}", comparison)?;
        writeln!(writer, "  File A total rows: {}", stats.file1_total)?;
        writeln!(writer, "  File B total rows: {}", stats.file2_total)?;
        writeln!(writer, "  File A distinct rows: {}", stats.file1_distinct)?;
        writeln!(writer, "  File B distinct rows: {}", stats.file2_distinct)?;
        writeln!(writer, "  Common rows: {}", stats.common_count)?;
        writeln!(writer, "  Unique to File A: {}", stats.file1_unique)?;
        writeln!(writer, "  Unique to File B: {}", stats.file2_unique)?;
        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(WIDE_RULE))?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_rows(
        &self,
        title: &str,
        marker: char,
        rows: &[Row],
        writer: &mut dyn Write,
    ) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        writeln!(writer, "{} ({} rows):", title, rows.len())?;
        writeln!(writer, "{}", "-".repeat(NARROW_RULE))?;
        for (i, row) in rows.iter().enumerate() {
            writeln!(writer, "{} [{:4}] {}", marker, i + 1, self.render_row(row))?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn render_row(&self, row: &Row) -> String {
        let text = row.fields.join(FIELD_SEPARATOR);
        match self.max_row_width {
            Some(width) => truncate(text, width),
            None => text,
        }
    }
}

impl Default for TextOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OutputFormatter for TextOutput {
    fn render(
        &self,
        diff: &DiffResult,
        header: &ReportHeader,
        writer: &mut dyn Write,
    ) -> Result<()> {
        self.write_header(header, writer)?;

        match diff {
            DiffResult::Literal(literal) => self.write_literal(literal, writer),
            DiffResult::Entry(entry) => self.write_entry(entry, writer),
        }
    }
}

/// Cut `text` to `width` characters, marking the cut
fn truncate(text: String, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATED_MARKER),
        None => text,
    }
}
