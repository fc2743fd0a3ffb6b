// Statement Merge - Core Library
// Extracts the data region of loosely formatted spreadsheet exports, enriches
// each record and merges everything into one sorted table

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod grid;
pub mod locator;
pub mod mapping;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod sort;
pub mod temporal;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{MergeError, Result};
pub use export::{export, write_table};
pub use filter::{filter_rows, is_record};
pub use grid::{Cell, Grid, Row};
pub use locator::{Region, TableLocator};
pub use mapping::CompanyMapping;
pub use merge::{merge, MergedRow, MergedTable};
pub use parser::{
    detect_source, get_reader, read_grid,
    CsvReader, SheetReader, SourceType, SpreadsheetReader,
};
pub use pipeline::{Pipeline, RunOutcome, RunSummary, SourceFileStat};
pub use report::{CollectingReporter, ConsoleReporter, Notice, Reporter};
pub use rules::{
    classify, compile_patterns, extract_bank,
    Classifier, CompanyPattern, Record,
};
pub use sort::{compare_rows, sort_table};
pub use temporal::{
    detect_date_column, parse_date, parse_index,
    ColumnTyper, TypedRow, TypedTable,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
