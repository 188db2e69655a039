//! csvdiff - Compare two CSV files and write a difference report

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;

use csvdiff::{compare, write_report, CompareMode, Config, OutputDir, ReportFormat};

/// Compare two CSV files and generate difference reports
#[derive(Parser, Debug)]
#[command(name = "csvdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the first CSV file
    file1: PathBuf,

    /// Path to the second CSV file
    file2: PathBuf,

    /// Directory to save the difference reports
    #[arg(short, long, default_value = "./diff_reports")]
    output: PathBuf,

    /// Comparison mode: literal (line-by-line), entry (distinct rows) or multiset
    #[arg(short, long)]
    mode: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Count the number of differing rows
    #[arg(short, long)]
    count: bool,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Context lines around changes in literal mode
    #[arg(short = 'U', long, default_value_t = 3)]
    context: usize,

    /// Omit modification times from literal diff labels
    #[arg(long)]
    no_timestamps: bool,

    /// Truncate rows longer than this many characters in entry reports
    #[arg(long)]
    max_row_width: Option<usize>,

    /// Report format: text or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Create a missing output directory without asking
    #[arg(short, long)]
    yes: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        println!("Comparing {} and {}", cli.file1.display(), cli.file2.display());
    }
    if cli.count {
        println!("Counting differing rows...");
    }

    if !cli.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }

    let mode = CompareMode::from_optional(cli.mode.as_deref())?;
    println!("Generating {} difference report...", mode);

    let mut config = Config::new(mode)
        .with_delimiter(cli.delimiter as u8)
        .with_context_lines(cli.context)
        .with_timestamps(!cli.no_timestamps)
        .with_report_format(cli.format.parse::<ReportFormat>()?);
    if let Some(width) = cli.max_row_width {
        config = config.with_max_row_width(width);
    }

    let outcome = compare(&cli.file1, &cli.file2, &config).context("Comparison failed")?;

    if outcome.is_empty() {
        println!("No differences found.");
        return Ok(());
    }

    let output_dir = prepare_output_dir(&cli.output, cli.yes)?;
    if let Some(path) = write_report(&outcome, &output_dir, &config)? {
        if cli.verbose {
            println!("Difference report saved to {}", path.display());
        }
    }

    if cli.count {
        println!("Total differing rows: {}", outcome.differing_rows());
    }

    Ok(())
}

/// Make sure the output directory exists, asking before creating it
fn prepare_output_dir(path: &Path, assume_yes: bool) -> Result<OutputDir> {
    if !path.exists() {
        let create = assume_yes || confirm(&format!(
            "Output directory {} does not exist. Create it? (y/n): ",
            path.display()
        ))?;
        if !create {
            bail!("Output directory creation declined");
        }
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory: {}", path.display()))?;
    }

    Ok(OutputDir::validate(path)?)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
