// 🧱 Grid - Raw cell model
// A headerless 2-D view of one sheet, exactly as read from the source file

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// ============================================================================
// CELL
// ============================================================================

/// One cell value
///
/// `Empty` is a blank cell in the source. `Missing` never comes from a source
/// file: it marks padding added at merge time and values that failed coercion.
/// Both serialize as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// Empty or missing
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Empty | Cell::Missing)
    }

    /// Text rendering used for pattern matching and output
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(format_number(*n)),
            Cell::Empty | Cell::Missing => Cow::Borrowed(""),
        }
    }
}

/// Integral values print without a fractional part ("12", not "12.0")
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// True when `text`, trimmed, is one or more ASCII digits and nothing else
pub fn is_bare_integer(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

// ============================================================================
// GRID
// ============================================================================

pub type Row = Vec<Cell>;

/// Rows of one source sheet, tagged with the file they came from
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    source: String,
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(source: impl Into<String>, rows: Vec<Row>) -> Self {
        Grid {
            source: source.into(),
            rows,
        }
    }

    /// File name used in notices
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// Build a row of text cells for fixtures
#[cfg(test)]
pub(crate) fn text_row(values: &[&str]) -> Row {
    values.iter().map(|v| Cell::text(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rendering() {
        assert_eq!(Cell::Number(42.0).as_text(), "42");
        assert_eq!(Cell::Number(-3.0).as_text(), "-3");
        assert_eq!(Cell::Number(1.25).as_text(), "1.25");
        assert_eq!(Cell::Missing.as_text(), "");
    }

    #[test]
    fn test_bare_integer() {
        assert!(is_bare_integer("17"));
        assert!(is_bare_integer("  007 "));
        assert!(!is_bare_integer(""));
        assert!(!is_bare_integer("   "));
        assert!(!is_bare_integer("1.5"));
        assert!(!is_bare_integer("-4"));
        assert!(!is_bare_integer("№ 1"));
    }

    #[test]
    fn test_empty_string_becomes_empty_cell() {
        assert_eq!(Cell::text(""), Cell::Empty);
        assert!(Cell::text("").is_blank());
        assert!(!Cell::text(" ").is_blank());
    }
}
