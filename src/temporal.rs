// ⏰ Column Typer
// Detects the day-first date column and coerces it together with the
// leading index column
//
// Coercion never fails a row: unparseable values become missing markers and
// sort last.

use crate::grid::Cell;
use crate::merge::{MergedRow, MergedTable};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Rows sampled per column when looking for dates
pub const DATE_SAMPLE_ROWS: usize = 50;

/// Canonical output format
pub const DATE_FORMAT: &str = "%d.%m.%Y";

static DATE_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").unwrap());

static DAY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[./-](\d{1,2})[./-](\d{4})(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
        .unwrap()
});

static ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$").unwrap()
});

// ============================================================================
// TYPED TABLE
// ============================================================================

/// A merged row with its coerced sort components
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRow {
    pub row: MergedRow,
    pub index: Option<f64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedTable {
    pub rows: Vec<TypedRow>,
    pub width: usize,
    pub date_column: Option<usize>,
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a day-first date ("1.2.2024", "01/02/2024 10:00"); ISO
/// "2024-02-01" is accepted too. Impossible dates yield None.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(caps) = DAY_FIRST.captures(text) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = ISO.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Numeric value of the index cell
pub fn parse_index(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        Cell::Empty | Cell::Missing => return None,
    };
    value.is_finite().then_some(value)
}

/// First column (left to right) holding a d.m.yyyy value within the first
/// `sample_rows` rows
pub fn detect_date_column(table: &MergedTable, sample_rows: usize) -> Option<usize> {
    let sample = &table.rows()[..table.len().min(sample_rows)];
    (0..table.width()).find(|&col| {
        sample
            .iter()
            .any(|row| DATE_HINT.is_match(&row.cells[col].as_text()))
    })
}

// ============================================================================
// COLUMN TYPER
// ============================================================================

pub struct ColumnTyper {
    sample_rows: usize,
}

impl ColumnTyper {
    pub fn new(sample_rows: usize) -> Self {
        ColumnTyper { sample_rows }
    }

    pub fn apply(&self, table: MergedTable) -> TypedTable {
        let date_column = detect_date_column(&table, self.sample_rows);
        let (rows, width) = table.into_parts();

        let rows: Vec<TypedRow> = rows
            .into_iter()
            .map(|mut row| {
                let date = date_column.and_then(|col| {
                    let parsed = parse_date(&row.cells[col].as_text());
                    row.cells[col] = match parsed {
                        Some(d) => Cell::Text(d.format(DATE_FORMAT).to_string()),
                        None => Cell::Missing,
                    };
                    parsed
                });

                let index = row.cells.first().and_then(parse_index);
                if let Some(first) = row.cells.first_mut() {
                    *first = index.map(Cell::Number).unwrap_or(Cell::Missing);
                }

                TypedRow { row, index, date }
            })
            .collect();

        debug!(
            ?date_column,
            rows = rows.len(),
            missing_dates = rows.iter().filter(|r| date_column.is_some() && r.date.is_none()).count(),
            "typed columns"
        );

        TypedTable {
            rows,
            width,
            date_column,
        }
    }
}

impl Default for ColumnTyper {
    fn default() -> Self {
        Self::new(DATE_SAMPLE_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::text_row;
    use crate::merge::merge;
    use crate::rules::Record;

    fn table(rows: &[&[&str]]) -> MergedTable {
        let records = rows
            .iter()
            .map(|r| Record {
                cells: text_row(r),
                company: "Unknown".to_string(),
                bank: "Unknown".to_string(),
            })
            .collect();
        merge(vec![records]).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("01.02.2024"), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(parse_date(" 1.2.2024 "), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(parse_date("05/03/2023"), NaiveDate::from_ymd_opt(2023, 3, 5));
        assert_eq!(parse_date("31.12.2023 23:59:00"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(parse_date("2024-02-01"), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("оплата от 01.02.2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index(&Cell::text(" 12 ")), Some(12.0));
        assert_eq!(parse_index(&Cell::Number(3.0)), Some(3.0));
        assert_eq!(parse_index(&Cell::text("n/a")), None);
        assert_eq!(parse_index(&Cell::text("NaN")), None);
        assert_eq!(parse_index(&Cell::Missing), None);
    }

    #[test]
    fn test_detects_first_date_column() {
        let t = table(&[
            &["1", "text", "01.02.2024", "15.03.2024"],
            &["2", "more", "", ""],
        ]);
        assert_eq!(detect_date_column(&t, DATE_SAMPLE_ROWS), Some(2));
    }

    #[test]
    fn test_date_hint_anywhere_in_sample() {
        let mut rows: Vec<Vec<String>> = (0..50).map(|i| vec![i.to_string(), "x".to_string()]).collect();
        rows[49][1] = "01.02.2024".to_string();
        let refs: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
        let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();

        let t = table(&slices);
        assert_eq!(detect_date_column(&t, 50), Some(1));
        assert_eq!(detect_date_column(&t, 49), None);
    }

    #[test]
    fn test_no_date_column() {
        let t = table(&[&["1", "2024-02-01", "1/2/24"], &["2", "abc", "12.2024"]]);
        assert_eq!(detect_date_column(&t, DATE_SAMPLE_ROWS), None);

        let typed = ColumnTyper::default().apply(t);
        assert_eq!(typed.date_column, None);
        assert!(typed.rows.iter().all(|r| r.date.is_none()));
        assert_eq!(typed.rows[0].row.cells[1], Cell::text("2024-02-01"));
    }

    #[test]
    fn test_coerces_date_and_index_columns() {
        let t = table(&[
            &["7", "1.2.2024"],
            &["8", "not a date"],
            &["9", "30.02.2024"],
        ]);

        let typed = ColumnTyper::default().apply(t);
        assert_eq!(typed.date_column, Some(1));

        let first = &typed.rows[0];
        assert_eq!(first.index, Some(7.0));
        assert_eq!(first.row.cells[0], Cell::Number(7.0));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(first.row.cells[1], Cell::text("01.02.2024"));

        assert_eq!(typed.rows[1].date, None);
        assert_eq!(typed.rows[1].row.cells[1], Cell::Missing);
        assert_eq!(typed.rows[2].row.cells[1], Cell::Missing);
        assert_eq!(typed.rows.len(), 3);
    }
}
