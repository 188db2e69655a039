//! Line-oriented unified diff of serialized rows

use std::fs;
use std::ops::Range;
use std::path::Path;

use chrono::{DateTime, Local};
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp, DiffTag};

use crate::model::Table;

/// Default number of unchanged lines shown around a change
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Tag of a single line inside a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// A contiguous block of context, added and removed lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Zero-based line range covered on the old side
    pub old_range: Range<usize>,
    /// Zero-based line range covered on the new side
    pub new_range: Range<usize>,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// The `@@ -a,b +c,d @@` header line
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(&self.old_range),
            format_range(&self.new_range)
        )
    }
}

/// Unified range notation: 1-based start, length omitted when it is 1
fn format_range(range: &Range<usize>) -> String {
    let length = range.len();
    match length {
        0 => format!("{},0", range.start),
        1 => format!("{}", range.start + 1),
        _ => format!("{},{}", range.start + 1, length),
    }
}

/// Unified diff between two tables; no hunks means no differences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralDiff {
    pub old_label: String,
    pub new_label: String,
    pub hunks: Vec<Hunk>,
}

impl LiteralDiff {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn added_count(&self) -> usize {
        self.count(LineKind::Added)
    }

    pub fn removed_count(&self) -> usize {
        self.count(LineKind::Removed)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Render as unified diff lines, without line terminators
    ///
    /// An empty diff renders to no lines at all, file headers included.
    pub fn to_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut lines = vec![
            format!("--- {}", self.old_label),
            format!("+++ {}", self.new_label),
        ];
        for hunk in &self.hunks {
            lines.push(hunk.header());
            lines.extend(
                hunk.lines
                    .iter()
                    .map(|l| format!("{}{}", l.kind.prefix(), l.text)),
            );
        }
        lines
    }
}

/// Computes unified diffs over rows serialized as delimited lines
pub struct LiteralComparator {
    delimiter: u8,
    context_lines: usize,
    include_timestamps: bool,
}

impl Default for LiteralComparator {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl LiteralComparator {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            context_lines: DEFAULT_CONTEXT_LINES,
            include_timestamps: true,
        }
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Diff the serialized lines of two tables
    pub fn diff(&self, old_table: &Table, new_table: &Table) -> LiteralDiff {
        let old_lines = old_table.to_lines(self.delimiter);
        let new_lines = new_table.to_lines(self.delimiter);

        let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);
        let hunks: Vec<Hunk> = group_diff_ops(ops, self.context_lines)
            .into_iter()
            .filter(|group| group.iter().any(|op| op.tag() != DiffTag::Equal))
            .map(|group| build_hunk(&group, &old_lines, &new_lines))
            .collect();

        log::debug!(
            "Literal diff: {} vs {} lines, {} hunks",
            old_lines.len(),
            new_lines.len(),
            hunks.len()
        );

        LiteralDiff {
            old_label: self.label("a", old_table.source()),
            new_label: self.label("b", new_table.source()),
            hunks,
        }
    }

    /// `a/<name>` optionally followed by a tab and the modification time
    fn label(&self, side: &str, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let identifier = format!("{}/{}", side, name);

        if !self.include_timestamps {
            return identifier;
        }

        match modification_time(path) {
            Some(mtime) => format!("{}\t{}", identifier, mtime),
            None => identifier,
        }
    }
}

fn modification_time(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

fn build_hunk(group: &[DiffOp], old_lines: &[String], new_lines: &[String]) -> Hunk {
    let mut lines = Vec::new();

    for op in group {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push_lines(&mut lines, LineKind::Context, &old_lines[old_range]),
            DiffTag::Delete => push_lines(&mut lines, LineKind::Removed, &old_lines[old_range]),
            DiffTag::Insert => push_lines(&mut lines, LineKind::Added, &new_lines[new_range]),
            DiffTag::Replace => {
                push_lines(&mut lines, LineKind::Removed, &old_lines[old_range]);
                push_lines(&mut lines, LineKind::Added, &new_lines[new_range]);
            }
        }
    }

    // Groups are never empty, and the caller drops all-equal groups
    let first = &group[0];
    let last = &group[group.len() - 1];

    Hunk {
        old_range: first.old_range().start..last.old_range().end,
        new_range: first.new_range().start..last.new_range().end,
        lines,
    }
}

fn push_lines(out: &mut Vec<DiffLine>, kind: LineKind, lines: &[String]) {
    out.extend(lines.iter().map(|text| DiffLine {
        kind,
        text: text.clone(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, records: &[&[&str]]) -> Table {
        Table::from_records(name, records.iter().map(|r| r.iter().copied()))
    }

    fn comparator() -> LiteralComparator {
        LiteralComparator::default().with_timestamps(false)
    }

    #[test]
    fn test_identical_tables_produce_no_lines() {
        let a = table("a.csv", &[&["id", "name"], &["1", "alice"]]);
        let diff = comparator().diff(&a, &a);
        assert!(diff.is_empty());
        assert!(diff.to_lines().is_empty());
    }

    #[test]
    fn test_empty_tables_produce_no_lines() {
        let a = table("a.csv", &[]);
        assert!(comparator().diff(&a, &a).to_lines().is_empty());
    }

    #[test]
    fn test_changed_row() {
        let a = table("a.csv", &[&["id", "name"], &["1", "alice"], &["2", "bob"]]);
        let b = table("b.csv", &[&["id", "name"], &["1", "alice"], &["2", "bobby"]]);

        let diff = comparator().diff(&a, &b);
        assert_eq!(
            diff.to_lines(),
            vec![
                "--- a/a.csv",
                "+++ b/b.csv",
                "@@ -1,3 +1,3 @@",
                " id,name",
                " 1,alice",
                "-2,bob",
                "+2,bobby",
            ]
        );
        assert_eq!(diff.added_count(), 1);
        assert_eq!(diff.removed_count(), 1);
    }

    #[test]
    fn test_context_is_limited() {
        let old: Vec<Vec<String>> = (0..20).map(|i| vec![i.to_string()]).collect();
        let mut new = old.clone();
        new[10] = vec!["ten".to_string()];
        let a = Table::from_records("a.csv", old);
        let b = Table::from_records("b.csv", new);

        let diff = comparator().diff(&a, &b);
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.header(), "@@ -8,7 +8,7 @@");
        assert_eq!(hunk.lines.len(), 8);
        assert_eq!(hunk.lines[0].text, "7");
        assert_eq!(hunk.lines[7].text, "13");

        let narrow = comparator().with_context_lines(0).diff(&a, &b);
        assert_eq!(narrow.hunks[0].header(), "@@ -11 +11 @@");
    }

    #[test]
    fn test_distant_changes_split_into_hunks() {
        let old: Vec<Vec<String>> = (0..30).map(|i| vec![i.to_string()]).collect();
        let mut new = old.clone();
        new[2] = vec!["x".to_string()];
        new[25] = vec!["y".to_string()];
        let diff = comparator().diff(
            &Table::from_records("a.csv", old),
            &Table::from_records("b.csv", new),
        );
        assert_eq!(diff.hunks.len(), 2);
    }

    #[test]
    fn test_empty_side_range_notation() {
        let a = table("a.csv", &[]);
        let b = table("b.csv", &[&["1"], &["2"]]);
        let diff = comparator().diff(&a, &b);
        assert_eq!(diff.hunks[0].header(), "@@ -0,0 +1,2 @@");
        assert_eq!(diff.added_count(), 2);
    }

    #[test]
    fn test_labels_without_timestamps_use_file_name() {
        let a = table("some/dir/a.csv", &[&["1"]]);
        let b = table("other/b.csv", &[&["2"]]);
        let diff = comparator().diff(&a, &b);
        assert_eq!(diff.old_label, "a/a.csv");
        assert_eq!(diff.new_label, "b/b.csv");
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_identifier() {
        let a = table("/nonexistent/a.csv", &[&["1"]]);
        let b = table("/nonexistent/b.csv", &[&["2"]]);
        let diff = LiteralComparator::default().diff(&a, &b);
        assert_eq!(diff.old_label, "a/a.csv");
    }

    #[test]
    fn test_label_includes_modification_time() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let a = Table::from_records(file.path(), [["1"]]);
        let b = Table::from_records(file.path(), [["2"]]);
        let diff = LiteralComparator::default().diff(&a, &b);
        let (identifier, time) = diff.old_label.split_once('\t').unwrap();
        assert!(identifier.starts_with("a/"));
        assert!(time.contains('T'));
    }
}
