//! Comparison orchestration: validate, load, diff, and persist reports

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{CompareMode, Config};
use crate::diff::{compute_diff, DiffResult};
use crate::error::{DiffError, Result};
use crate::output::{format_report, OutputFactory, ReportHeader};
use crate::parser::{check_file_types, ParserFactory};

/// Everything produced by one comparison run
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    pub source_a: PathBuf,
    pub source_b: PathBuf,
    pub mode: CompareMode,
    pub result: DiffResult,
    pub compared_at: DateTime<Local>,
}

impl ComparisonOutcome {
    /// True when the comparison found no differences
    pub fn is_empty(&self) -> bool {
        !self.result.has_changes()
    }

    /// Number of rows that differ between the two files
    pub fn differing_rows(&self) -> usize {
        self.result.differing_rows()
    }

    fn header(&self) -> ReportHeader {
        ReportHeader::new(&self.source_a, &self.source_b, self.compared_at)
    }
}

/// Compare two CSV files
///
/// Extensions are checked before either file is opened. The mode in
/// `config` selects the comparator.
pub fn compare(path_a: &Path, path_b: &Path, config: &Config) -> Result<ComparisonOutcome> {
    check_file_types(path_a, path_b)?;

    let factory = ParserFactory::new();
    let table_a = factory.parse(path_a, config)?;
    let table_b = factory.parse(path_b, config)?;

    let result = compute_diff(&table_a, &table_b, config);

    Ok(ComparisonOutcome {
        source_a: path_a.to_path_buf(),
        source_b: path_b.to_path_buf(),
        mode: config.mode,
        result,
        compared_at: Local::now(),
    })
}

/// Compare two files with a mode given as text, `None` meaning literal
pub fn compare_with_mode(
    path_a: &Path,
    path_b: &Path,
    mode: Option<&str>,
    config: &Config,
) -> Result<ComparisonOutcome> {
    let mode = CompareMode::from_optional(mode)?;
    compare(path_a, path_b, &config.clone().with_mode(mode))
}

/// Render the report for an outcome
pub fn render(outcome: &ComparisonOutcome, config: &Config) -> Result<String> {
    format_report(&outcome.result, &outcome.header(), config)
}

/// A directory that exists and accepts report files
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Validate `path` as a report destination
    ///
    /// Relative paths are resolved against the current directory. The
    /// directory is never created here.
    pub fn validate(path: &Path) -> Result<Self> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let metadata = fs::metadata(&path)
            .map_err(|e| DiffError::output_unavailable(&path, e.to_string()))?;
        if !metadata.is_dir() {
            return Err(DiffError::output_unavailable(&path, "not a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(DiffError::output_unavailable(&path, "directory is read-only"));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamped report file path inside this directory
    ///
    /// `attempt` above zero adds a numeric suffix to tell apart reports
    /// created within the same second.
    pub fn report_path(&self, at: DateTime<Local>, extension: &str, attempt: usize) -> PathBuf {
        let stamp = at.format("%Y%m%d_%H%M%S");
        let name = match attempt {
            0 => format!("diff_report_{}.{}", stamp, extension),
            n => format!("diff_report_{}_{}.{}", stamp, n, extension),
        };
        self.path.join(name)
    }

    /// Create a new report file, never reusing an existing name
    fn create_report(&self, at: DateTime<Local>, extension: &str) -> Result<(PathBuf, File)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.report_path(at, extension, attempt);
            match File::options().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(DiffError::output_unavailable(
            &self.path,
            "too many reports with the same timestamp",
        ))
    }
}

const MAX_NAME_ATTEMPTS: usize = 1000;

/// Write the report for `outcome` into `dir`
///
/// Returns `Ok(None)` without touching the filesystem when there are no
/// differences.
pub fn write_report(
    outcome: &ComparisonOutcome,
    dir: &OutputDir,
    config: &Config,
) -> Result<Option<PathBuf>> {
    if outcome.is_empty() {
        log::debug!("No differences, skipping report");
        return Ok(None);
    }

    let formatter = OutputFactory::create(config);
    let (report_path, file) = dir.create_report(Local::now(), config.report_format.extension())?;

    let mut writer = BufWriter::new(file);
    let written = formatter
        .render(&outcome.result, &outcome.header(), &mut writer)
        .and_then(|()| writer.flush().map_err(DiffError::from));
    drop(writer);

    // A partially written report is never left behind
    if let Err(e) = written {
        let _ = fs::remove_file(&report_path);
        return Err(e);
    }

    log::debug!("Wrote report to {}", report_path.display());
    Ok(Some(report_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_extension_checked_before_reading() {
        // Neither file exists, so a read error would surface if opened first
        let err = compare(Path::new("missing.csv"), Path::new("missing.txt"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, DiffError::UnsupportedType { .. }));
    }

    #[test]
    fn test_unknown_mode() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "x\n");
        let err = compare_with_mode(&a, &a, Some("summary"), &Config::default()).unwrap_err();
        match err {
            DiffError::UnknownMode { mode } => assert_eq!(mode, "summary"),
            other => panic!("Expected UnknownMode, got {:?}", other),
        }
    }

    #[test]
    fn test_omitted_mode_is_literal() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "x\n");
        let outcome = compare_with_mode(&a, &a, None, &Config::new(CompareMode::Entry)).unwrap();
        assert_eq!(outcome.mode, CompareMode::Literal);
        assert!(matches!(outcome.result, DiffResult::Literal(_)));
    }

    #[test]
    fn test_identical_files_write_nothing() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "id,name\n1,alice\n");
        let b = write_csv(&dir, "b.csv", "id,name\n1,alice\n");

        for mode in [CompareMode::Literal, CompareMode::Entry] {
            let config = Config::new(mode);
            let outcome = compare(&a, &b, &config).unwrap();
            assert!(outcome.is_empty());

            let output_dir = OutputDir::validate(out.path()).unwrap();
            assert!(write_report(&outcome, &output_dir, &config).unwrap().is_none());
        }
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_written_for_differences() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "id,name\n1,alice\n2,bob\n");
        let b = write_csv(&dir, "b.csv", "id,name\n1,alice\n2,bobby\n");

        let config = Config::new(CompareMode::Entry);
        let outcome = compare(&a, &b, &config).unwrap();
        assert_eq!(outcome.differing_rows(), 2);

        let output_dir = OutputDir::validate(out.path()).unwrap();
        let path = write_report(&outcome, &output_dir, &config).unwrap().unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("diff_report_"));
        assert!(name.ends_with(".diff"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, render(&outcome, &config).unwrap());
        assert!(content.contains("- [   1] 2, bob"));
    }

    #[test]
    fn test_reports_in_same_second_do_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "1\n");
        let b = write_csv(&dir, "b.csv", "2\n");

        let config = Config::new(CompareMode::Entry);
        let outcome = compare(&a, &b, &config).unwrap();
        let output_dir = OutputDir::validate(out.path()).unwrap();

        let first = write_report(&outcome, &output_dir, &config).unwrap().unwrap();
        let second = write_report(&outcome, &output_dir, &config).unwrap().unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 2);
        assert!(!fs::read_to_string(&first).unwrap().is_empty());
    }

    #[test]
    fn test_report_path_suffix() {
        let out = TempDir::new().unwrap();
        let output_dir = OutputDir::validate(out.path()).unwrap();
        let at = Local::now();
        let stamp = at.format("%Y%m%d_%H%M%S").to_string();

        let base = output_dir.report_path(at, "diff", 0);
        assert!(base.ends_with(format!("diff_report_{}.diff", stamp)));
        let suffixed = output_dir.report_path(at, "diff", 2);
        assert!(suffixed.ends_with(format!("diff_report_{}_2.diff", stamp)));

        // An existing file with the base name is skipped
        fs::write(&base, "taken").unwrap();
        let (path, _file) = output_dir.create_report(at, "diff").unwrap();
        assert_eq!(path, output_dir.report_path(at, "diff", 1));
        assert_eq!(fs::read_to_string(&base).unwrap(), "taken");
    }

    #[test]
    fn test_json_report_extension() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "1\n");
        let b = write_csv(&dir, "b.csv", "2\n");

        let config = Config::new(CompareMode::Entry).with_report_format(ReportFormat::Json);
        let outcome = compare(&a, &b, &config).unwrap();
        let output_dir = OutputDir::validate(dir.path()).unwrap();
        let path = write_report(&outcome, &output_dir, &config).unwrap().unwrap();
        assert_eq!(path.extension().unwrap(), "json");
    }

    #[test]
    fn test_output_dir_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            OutputDir::validate(&missing),
            Err(DiffError::OutputUnavailable { .. })
        ));

        let file = write_csv(&dir, "a.csv", "x\n");
        assert!(matches!(
            OutputDir::validate(&file),
            Err(DiffError::OutputUnavailable { .. })
        ));
    }

    #[test]
    fn test_read_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let a = write_csv(&dir, "a.csv", "x\n");
        let err = compare(&a, &dir.path().join("b.csv"), &Config::default()).unwrap_err();
        assert!(matches!(err, DiffError::Read { .. }));
    }
}
