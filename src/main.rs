use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use statement_merge::{
    CompanyMapping, ConsoleReporter, MergeError, Pipeline, PipelineConfig, RunSummary,
};

/// Merge the numbered tables of several spreadsheet exports into one sorted CSV
#[derive(Parser, Debug)]
#[command(name = "statement-merge", version)]
struct Cli {
    /// Source files (xlsx, xls, xlsb, ods, csv), processed in the given order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Destination CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Company mapping file ("Full Name - Short Name" per line)
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 0-based column holding the counterparty name
    #[arg(long)]
    company_column: Option<usize>,

    /// 0-based column holding the quoted bank description
    #[arg(long)]
    bank_column: Option<usize>,

    /// Output field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Label used when no company or bank can be derived
    #[arg(long)]
    unknown_label: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("statement_merge={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(col) = cli.company_column {
        config.company_column = col;
    }
    if let Some(col) = cli.bank_column {
        config.bank_column = col;
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(label) = &cli.unknown_label {
        config.unknown_label = label.clone();
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid command-line options")?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Files merged:");
    for stat in &summary.files {
        println!(
            "   {:<40} {:>6} records  ({} unknown companies, {} unknown banks)",
            stat.source_file, stat.records, stat.unknown_companies, stat.unknown_banks
        );
    }
    if !summary.skipped.is_empty() {
        println!("   {} file(s) skipped", summary.skipped.len());
    }
    match summary.date_column {
        Some(col) => println!("   Date column: {}", col),
        None => println!("   Date column: not detected"),
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;

    let mapping = match &cli.mapping {
        Some(path) => CompanyMapping::from_file(path)
            .with_context(|| format!("Failed to load company mapping: {}", path.display()))?,
        None => CompanyMapping::new(),
    };

    let pipeline = Pipeline::new(config, &mapping);
    match pipeline.run_to_file(&cli.files, &cli.output, &ConsoleReporter) {
        Ok(outcome) => {
            print_summary(&outcome.summary);
            Ok(true)
        }
        // already shown to the user by the reporter
        Err(MergeError::NoDataCollected | MergeError::OutputWriteFailure { .. }) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}
