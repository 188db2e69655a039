//! Entry-wise comparison of rows as set or multiset members

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::{Row, Table};

/// How duplicate rows within one table are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Semantics {
    /// Duplicates collapse into one distinct value
    #[default]
    Set,
    /// Every copy counts
    Multiset,
}

/// Statistics about an entry-wise comparison
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStats {
    /// Raw row count of the first table
    pub file1_total: usize,
    /// Raw row count of the second table
    pub file2_total: usize,
    pub file1_distinct: usize,
    pub file2_distinct: usize,
    pub common_count: usize,
    pub file1_unique: usize,
    pub file2_unique: usize,
}

/// Rows found on only one side, rows found on both, and counts
///
/// All row lists are sorted by row content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDiff {
    pub semantics: Semantics,
    pub file1_only: Vec<Row>,
    pub file2_only: Vec<Row>,
    pub common: Vec<Row>,
    pub stats: EntryStats,
}

impl EntryDiff {
    pub fn has_changes(&self) -> bool {
        !self.file1_only.is_empty() || !self.file2_only.is_empty()
    }
}

/// Compares tables by whole-row value, ignoring position
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryComparator {
    semantics: Semantics,
}

impl EntryComparator {
    pub fn new(semantics: Semantics) -> Self {
        Self { semantics }
    }

    pub fn diff(&self, old_table: &Table, new_table: &Table) -> EntryDiff {
        let diff = match self.semantics {
            Semantics::Set => set_diff(&old_table.rows, &new_table.rows),
            Semantics::Multiset => multiset_diff(&old_table.rows, &new_table.rows),
        };

        log::debug!(
            "Entry diff ({:?}): {} only in A, {} only in B, {} common",
            self.semantics,
            diff.stats.file1_unique,
            diff.stats.file2_unique,
            diff.stats.common_count
        );

        diff
    }
}

fn set_diff(old_rows: &[Row], new_rows: &[Row]) -> EntryDiff {
    let old_set: BTreeSet<&Row> = old_rows.iter().collect();
    let new_set: BTreeSet<&Row> = new_rows.iter().collect();

    let file1_only: Vec<Row> = old_set.difference(&new_set).map(|r| (*r).clone()).collect();
    let file2_only: Vec<Row> = new_set.difference(&old_set).map(|r| (*r).clone()).collect();
    let common: Vec<Row> = old_set.intersection(&new_set).map(|r| (*r).clone()).collect();

    let stats = EntryStats {
        file1_total: old_rows.len(),
        file2_total: new_rows.len(),
        file1_distinct: old_set.len(),
        file2_distinct: new_set.len(),
        common_count: common.len(),
        file1_unique: file1_only.len(),
        file2_unique: file2_only.len(),
    };

    EntryDiff {
        semantics: Semantics::Set,
        file1_only,
        file2_only,
        common,
        stats,
    }
}

fn multiset_diff(old_rows: &[Row], new_rows: &[Row]) -> EntryDiff {
    let old_counts = count_rows(old_rows);
    let new_counts = count_rows(new_rows);

    let mut file1_only = Vec::new();
    let mut file2_only = Vec::new();
    let mut common = Vec::new();

    let distinct: BTreeSet<&Row> = old_counts.keys().chain(new_counts.keys()).copied().collect();
    for row in distinct {
        let in_old = old_counts.get(row).copied().unwrap_or(0);
        let in_new = new_counts.get(row).copied().unwrap_or(0);

        push_copies(&mut common, row, in_old.min(in_new));
        push_copies(&mut file1_only, row, in_old.saturating_sub(in_new));
        push_copies(&mut file2_only, row, in_new.saturating_sub(in_old));
    }

    let stats = EntryStats {
        file1_total: old_rows.len(),
        file2_total: new_rows.len(),
        file1_distinct: old_counts.len(),
        file2_distinct: new_counts.len(),
        common_count: common.len(),
        file1_unique: file1_only.len(),
        file2_unique: file2_only.len(),
    };

    EntryDiff {
        semantics: Semantics::Multiset,
        file1_only,
        file2_only,
        common,
        stats,
    }
}

fn count_rows(rows: &[Row]) -> FxHashMap<&Row, usize> {
    let mut counts = FxHashMap::default();
    for row in rows {
        *counts.entry(row).or_insert(0) += 1;
    }
    counts
}

fn push_copies(out: &mut Vec<Row>, row: &Row, copies: usize) {
    out.extend(std::iter::repeat(row).take(copies).cloned());
}
