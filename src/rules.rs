// 🏷️ Classification Rules - Rules as Data
// Derives the `company` and `bank` enrichment fields for each record

use crate::grid::{Grid, Row};
use crate::mapping::CompanyMapping;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel for a failed match or extraction
pub const UNKNOWN: &str = "Unknown";

/// Default counterparty column (0-based)
pub const COMPANY_COLUMN: usize = 8;

/// Default bank-description column (0-based)
pub const BANK_COLUMN: usize = 9;

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());

// ============================================================================
// COMPANY MATCHERS
// ============================================================================

/// One compiled mapping entry: case-insensitive, unanchored substring match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyPattern {
    /// Lowercased full name
    needle: String,
    pub label: String,
}

impl CompanyPattern {
    pub fn new(full_name: &str, label: &str) -> Self {
        CompanyPattern {
            needle: full_name.to_lowercase(),
            label: label.to_string(),
        }
    }

    /// `text_lower` must already be lowercased
    fn matches_lower(&self, text_lower: &str) -> bool {
        text_lower.contains(&self.needle)
    }
}

/// Compile the mapping once, preserving its order
pub fn compile_patterns(mapping: &CompanyMapping) -> Vec<CompanyPattern> {
    mapping
        .entries()
        .iter()
        .map(|(full, short)| CompanyPattern::new(full, short))
        .collect()
}

/// First pattern found in `text` wins
pub fn classify<'a>(text: &str, patterns: &'a [CompanyPattern]) -> Option<&'a str> {
    let text_lower = text.to_lowercase();
    patterns
        .iter()
        .find(|p| p.matches_lower(&text_lower))
        .map(|p| p.label.as_str())
}

/// Last double-quoted span, trimmed; blank spans do not count
pub fn extract_bank(text: &str) -> Option<&str> {
    QUOTED
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// RECORD
// ============================================================================

/// A filtered data row plus its two enrichment fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub cells: Row,
    pub company: String,
    pub bank: String,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct Classifier {
    patterns: Vec<CompanyPattern>,
    company_column: usize,
    bank_column: usize,
    unknown: String,
}

impl Classifier {
    pub fn new(mapping: &CompanyMapping) -> Self {
        Classifier {
            patterns: compile_patterns(mapping),
            company_column: COMPANY_COLUMN,
            bank_column: BANK_COLUMN,
            unknown: UNKNOWN.to_string(),
        }
    }

    pub fn with_columns(mut self, company_column: usize, bank_column: usize) -> Self {
        self.company_column = company_column;
        self.bank_column = bank_column;
        self
    }

    pub fn with_unknown_label(mut self, label: &str) -> Self {
        self.unknown = label.to_string();
        self
    }

    /// Rows narrower than this get both fields set to the sentinel
    pub fn required_width(&self) -> usize {
        self.company_column.max(self.bank_column).saturating_add(1)
    }

    pub fn company(&self, row: &Row) -> String {
        if row.len() < self.required_width() {
            return self.unknown.clone();
        }
        let text = row[self.company_column].as_text();
        classify(&text, &self.patterns)
            .unwrap_or(self.unknown.as_str())
            .to_string()
    }

    pub fn bank(&self, row: &Row) -> String {
        if row.len() < self.required_width() {
            return self.unknown.clone();
        }
        let text = row[self.bank_column].as_text();
        extract_bank(&text)
            .unwrap_or(self.unknown.as_str())
            .to_string()
    }

    pub fn classify_row(&self, row: Row) -> Record {
        let company = self.company(&row);
        let bank = self.bank(&row);
        Record {
            cells: row,
            company,
            bank,
        }
    }

    pub fn classify_grid(&self, grid: Grid) -> Vec<Record> {
        grid.into_rows()
            .into_iter()
            .map(|row| self.classify_row(row))
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&CompanyMapping::new())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{text_row, Cell};

    fn row_with(company: &str, bank: &str) -> Row {
        let mut row = text_row(&["1", "", "", "", "", "", "", "", company, bank]);
        row.push(Cell::text("extra"));
        row
    }

    #[test]
    fn test_first_match_wins() {
        let mapping: CompanyMapping = [("Alpha Corp", "ALPHA"), ("Alpha", "A")]
            .into_iter()
            .collect();
        let patterns = compile_patterns(&mapping);

        assert_eq!(classify("Alpha Corp LLC", &patterns), Some("ALPHA"));
        assert_eq!(classify("alpha trading", &patterns), Some("A"));
        assert_eq!(classify("Beta", &patterns), None);
    }

    #[test]
    fn test_case_insensitive_cyrillic() {
        let mapping: CompanyMapping = [("ООО \"Ромашка\"", "Ромашка")].into_iter().collect();
        let patterns = compile_patterns(&mapping);

        assert_eq!(classify("оплата ооо \"РОМАШКА\" по счёту", &patterns), Some("Ромашка"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let mapping: CompanyMapping = [("A.B (C)", "ABC")].into_iter().collect();
        let patterns = compile_patterns(&mapping);

        assert_eq!(classify("x A.B (C) y", &patterns), Some("ABC"));
        assert_eq!(classify("AxB C", &patterns), None);
    }

    #[test]
    fn test_bank_extraction() {
        assert_eq!(extract_bank(r#"Paid to "Acme Bank" re "invoice 1""#), Some("invoice 1"));
        assert_eq!(extract_bank(r#"via "  Сбербанк  ""#), Some("Сбербанк"));
        assert_eq!(extract_bank("no quotes at all"), None);
        assert_eq!(extract_bank(r#"only "" empty"#), None);
        assert_eq!(extract_bank(""), None);
    }

    #[test]
    fn test_classify_row() {
        let mapping: CompanyMapping = [("Alpha Corp", "ALPHA")].into_iter().collect();
        let classifier = Classifier::new(&mapping);

        let record = classifier.classify_row(row_with("Alpha Corp LLC", r#"Bank "Tinkoff""#));
        assert_eq!(record.company, "ALPHA");
        assert_eq!(record.bank, "Tinkoff");
        assert_eq!(record.cells.len(), 11);

        let record = classifier.classify_row(row_with("Someone", ""));
        assert_eq!(record.company, UNKNOWN);
        assert_eq!(record.bank, UNKNOWN);
    }

    #[test]
    fn test_narrow_row_short_circuits() {
        let mapping: CompanyMapping = [("1", "ONE")].into_iter().collect();
        let classifier = Classifier::new(&mapping);

        let record = classifier.classify_row(text_row(&["1", "\"Bank\""]));
        assert_eq!(record.company, UNKNOWN);
        assert_eq!(record.bank, UNKNOWN);
    }

    #[test]
    fn test_empty_mapping_gives_sentinel() {
        let classifier = Classifier::default().with_unknown_label("Неизвестно");
        let record = classifier.classify_row(row_with("Alpha", r#""Bank""#));
        assert_eq!(record.company, "Неизвестно");
        assert_eq!(record.bank, "Bank");
    }

    #[test]
    fn test_configurable_columns() {
        let mapping: CompanyMapping = [("Alpha", "A")].into_iter().collect();
        let classifier = Classifier::new(&mapping).with_columns(1, 2);
        assert_eq!(classifier.required_width(), 3);

        let record = classifier.classify_row(text_row(&["7", "Alpha", "\"Bank X\""]));
        assert_eq!(record.company, "A");
        assert_eq!(record.bank, "Bank X");
    }

    #[test]
    fn test_huge_column_offset_gives_sentinel() {
        let classifier = Classifier::default().with_columns(usize::MAX, 9);
        assert_eq!(classifier.required_width(), usize::MAX);

        let record = classifier.classify_row(text_row(&["1", "x"]));
        assert_eq!(record.company, UNKNOWN);
        assert_eq!(record.bank, UNKNOWN);
    }
}
