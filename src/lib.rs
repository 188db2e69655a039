//! csvdiff - Literal and entry-wise comparison of CSV files
//!
//! Two tables are compared either as sequences of text lines (a unified
//! diff) or as collections of whole-row values (set or multiset difference
//! with statistics). Results render into a fixed-layout report.

pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use compare::{compare, compare_with_mode, render, write_report, ComparisonOutcome, OutputDir};
pub use config::{CompareMode, Config, ReportFormat};
pub use diff::DiffResult;
pub use error::{DiffError, Result};
pub use model::{Row, Table};
