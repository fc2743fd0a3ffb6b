// 🔗 Schema Merger
// Concatenates per-file records into one uniform-width table

use crate::error::{MergeError, Result};
use crate::grid::{Cell, Row};
use crate::rules::Record;
use std::borrow::Cow;

/// One merged row: data cells padded to the table width, then the two
/// enrichment fields
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub cells: Row,
    pub company: String,
    pub bank: String,
}

impl MergedRow {
    /// Every output field in column order (data columns, company, bank)
    pub fn fields(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.cells
            .iter()
            .map(Cell::as_text)
            .chain(std::iter::once(Cow::Borrowed(self.company.as_str())))
            .chain(std::iter::once(Cow::Borrowed(self.bank.as_str())))
    }
}

/// Rows from every processed file, in arrival order
///
/// Invariant: every row has exactly `width` data cells.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    rows: Vec<MergedRow>,
    width: usize,
}

impl MergedTable {
    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    /// Number of data columns (enrichment columns excluded)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (Vec<MergedRow>, usize) {
        (self.rows, self.width)
    }
}

/// Merge the record sets of every successfully processed file
///
/// An empty `batches` means no file survived and is fatal; a batch may
/// itself be empty (a file whose region held no records).
pub fn merge(batches: Vec<Vec<Record>>) -> Result<MergedTable> {
    if batches.is_empty() {
        return Err(MergeError::NoDataCollected);
    }

    let width = batches
        .iter()
        .flatten()
        .map(|r| r.cells.len())
        .max()
        .unwrap_or(0);

    let rows = batches
        .into_iter()
        .flatten()
        .map(|record| {
            let mut cells = record.cells;
            cells.resize(width, Cell::Missing);
            MergedRow {
                cells,
                company: record.company,
                bank: record.bank,
            }
        })
        .collect();

    Ok(MergedTable { rows, width })
}
