// ⚙️ Pipeline Configuration
// Layout assumptions of the upstream exports, kept as data rather than code

use crate::error::{MergeError, Result};
use crate::locator::TOTAL_MARKER;
use crate::rules::{BANK_COLUMN, COMPANY_COLUMN, UNKNOWN};
use crate::temporal::DATE_SAMPLE_ROWS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Widest sheet any supported spreadsheet format can hold (Excel's XFD)
pub const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 0-based column holding the counterparty name
    pub company_column: usize,

    /// 0-based column holding the quoted bank description
    pub bank_column: usize,

    /// Rows sampled per column during date detection
    pub date_sample_rows: usize,

    /// Case-insensitive marker of the footer row ending the data region
    pub total_marker: String,

    /// Sentinel written when no company or bank could be derived
    pub unknown_label: String,

    /// Output field delimiter
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            company_column: COMPANY_COLUMN,
            bank_column: BANK_COLUMN,
            date_sample_rows: DATE_SAMPLE_ROWS,
            total_marker: TOTAL_MARKER.to_string(),
            unknown_label: UNKNOWN.to_string(),
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| MergeError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        config.validate().map_err(invalid)?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(format!("unsupported delimiter {:?}", self.delimiter));
        }
        for (name, column) in [
            ("company_column", self.company_column),
            ("bank_column", self.bank_column),
        ] {
            if column >= MAX_COLUMNS {
                return Err(format!(
                    "{} {} is beyond the last column ({})",
                    name,
                    column,
                    MAX_COLUMNS - 1
                ));
            }
        }
        if self.total_marker.trim().is_empty() {
            return Err("total_marker must not be empty".to_string());
        }
        Ok(())
    }

    /// Delimiter as the single byte the csv writer expects
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}
