// 🚚 Merge Pipeline
// read → locate → filter → classify (per file), then merge → type → sort
//
// Each stage takes a value and returns a new one; nothing is shared between
// files except the list of finished record batches.

use crate::config::PipelineConfig;
use crate::error::{MergeError, Result};
use crate::export::export;
use crate::filter::filter_rows;
use crate::grid::Grid;
use crate::locator::TableLocator;
use crate::mapping::CompanyMapping;
use crate::merge::merge;
use crate::parser::{file_name, read_grid};
use crate::report::Reporter;
use crate::rules::{Classifier, Record};
use crate::sort::sort_table;
use crate::temporal::{ColumnTyper, TypedTable};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// RUN STATISTICS
// ============================================================================

/// Contribution of one successfully processed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFileStat {
    pub source_file: String,
    pub source_rows: usize,
    pub records: usize,
    pub unknown_companies: usize,
    pub unknown_banks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: Vec<SourceFileStat>,
    /// (file, reason) for every skipped file
    pub skipped: Vec<(String, String)>,
    pub total_rows: usize,
    pub date_column: Option<usize>,
}

/// Final table plus how it was assembled
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: TypedTable,
    pub summary: RunSummary,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    config: PipelineConfig,
    locator: TableLocator,
    classifier: Classifier,
    typer: ColumnTyper,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, mapping: &CompanyMapping) -> Self {
        let locator = TableLocator::new(&config.total_marker);
        let classifier = Classifier::new(mapping)
            .with_columns(config.company_column, config.bank_column)
            .with_unknown_label(&config.unknown_label);
        let typer = ColumnTyper::new(config.date_sample_rows);

        Pipeline {
            config,
            locator,
            classifier,
            typer,
        }
    }

    /// Locate, filter and classify one grid
    pub fn process_grid(&self, grid: &Grid) -> Result<Vec<Record>> {
        let located = self.locator.locate(grid)?;
        let filtered = filter_rows(located);
        Ok(self.classifier.classify_grid(filtered))
    }

    pub fn process_file(&self, path: &Path) -> Result<(Vec<Record>, SourceFileStat)> {
        let grid = read_grid(path)?;
        let records = self.process_grid(&grid)?;

        let unknown = self.config.unknown_label.as_str();
        let stat = SourceFileStat {
            source_file: grid.source().to_string(),
            source_rows: grid.len(),
            records: records.len(),
            unknown_companies: records.iter().filter(|r| r.company == unknown).count(),
            unknown_banks: records.iter().filter(|r| r.bank == unknown).count(),
        };
        Ok((records, stat))
    }

    /// Process files in order; a per-file failure is reported and skipped,
    /// anything else ends the run
    pub fn collect(
        &self,
        paths: &[PathBuf],
        reporter: &dyn Reporter,
    ) -> Result<(Vec<Vec<Record>>, RunSummary)> {
        let mut batches = Vec::new();
        let mut summary = RunSummary::default();

        for path in paths {
            match self.process_file(path) {
                Ok((records, stat)) => {
                    info!(file = %stat.source_file, records = stat.records, "processed file");
                    batches.push(records);
                    summary.files.push(stat);
                }
                Err(err) if err.is_per_file() => {
                    let file = file_name(path);
                    let reason = match &err {
                        MergeError::NoTableFound { .. } => "table start not found".to_string(),
                        MergeError::UnreadableFile { reason, .. } => reason.clone(),
                        other => other.to_string(),
                    };
                    warn!(file = %file, error = %err, "skipping file");
                    reporter.file_skipped(&file, &reason);
                    summary.skipped.push((file, reason));
                }
                Err(err) => return Err(err),
            }
        }

        Ok((batches, summary))
    }

    /// Build the final sorted table from record batches
    pub fn finish(&self, batches: Vec<Vec<Record>>) -> Result<TypedTable> {
        let merged = merge(batches)?;
        let typed = self.typer.apply(merged);
        Ok(sort_table(typed))
    }

    /// Everything except writing the output
    pub fn run(&self, paths: &[PathBuf], reporter: &dyn Reporter) -> Result<RunOutcome> {
        let (batches, mut summary) = self.collect(paths, reporter)?;

        let table = self.finish(batches).inspect_err(|err| {
            if matches!(err, MergeError::NoDataCollected) {
                reporter.no_data();
            }
        })?;

        summary.total_rows = table.rows.len();
        summary.date_column = table.date_column;
        Ok(RunOutcome { table, summary })
    }

    /// Run and write the result to `output`
    pub fn run_to_file(
        &self,
        paths: &[PathBuf],
        output: &Path,
        reporter: &dyn Reporter,
    ) -> Result<RunOutcome> {
        let outcome = self.run(paths, reporter)?;

        match export(&outcome.table, output, self.config.delimiter_byte()) {
            Ok(rows) => reporter.saved(output, rows),
            Err(err) => {
                let reason = match &err {
                    MergeError::OutputWriteFailure { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                reporter.write_failed(output, &reason);
                return Err(err);
            }
        }

        Ok(outcome)
    }
}

// ============================================================================
// TESTS
// ============================================================================
