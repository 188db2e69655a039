//! Diff engine for comparing tables

pub mod entry;
pub mod literal;

use crate::config::{CompareMode, Config};
use crate::model::Table;

pub use entry::{EntryComparator, EntryDiff, EntryStats, Semantics};
pub use literal::{DiffLine, Hunk, LineKind, LiteralComparator, LiteralDiff};

/// Result of comparing two tables in one of the supported modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    Literal(LiteralDiff),
    Entry(EntryDiff),
}

impl DiffResult {
    /// Check if there are any differences
    pub fn has_changes(&self) -> bool {
        match self {
            DiffResult::Literal(diff) => !diff.is_empty(),
            DiffResult::Entry(diff) => diff.has_changes(),
        }
    }

    /// Number of rows that differ between the two sides
    pub fn differing_rows(&self) -> usize {
        match self {
            DiffResult::Literal(diff) => diff.added_count() + diff.removed_count(),
            DiffResult::Entry(diff) => diff.file1_only.len() + diff.file2_only.len(),
        }
    }
}

/// Compare two tables with the comparator selected by `config.mode`
pub fn compute_diff(old_table: &Table, new_table: &Table, config: &Config) -> DiffResult {
    log::debug!("Comparing tables in {} mode", config.mode);

    match config.mode {
        CompareMode::Literal => {
            let comparator = LiteralComparator::new(config.delimiter)
                .with_context_lines(config.context_lines)
                .with_timestamps(config.include_timestamps);
            DiffResult::Literal(comparator.diff(old_table, new_table))
        }
        CompareMode::Entry => {
            DiffResult::Entry(EntryComparator::new(Semantics::Set).diff(old_table, new_table))
        }
        CompareMode::Multiset => {
            DiffResult::Entry(EntryComparator::new(Semantics::Multiset).diff(old_table, new_table))
        }
    }
}
