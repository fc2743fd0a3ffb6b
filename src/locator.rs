// 🔎 Table Locator
// Finds the numeric-indexed data region between a sheet's preamble and its
// "итого" footer

use crate::error::{MergeError, Result};
use crate::grid::{is_bare_integer, Grid, Row};
use tracing::debug;

/// Default footer marker (case-insensitive)
pub const TOTAL_MARKER: &str = "итого";

/// Bounds of the located region, in source row numbers (end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

pub struct TableLocator {
    marker: String,
}

impl TableLocator {
    pub fn new(marker: &str) -> Self {
        TableLocator {
            marker: marker.to_lowercase(),
        }
    }

    /// Locate the region without copying it
    pub fn find(&self, grid: &Grid) -> Result<Region> {
        let rows = grid.rows();

        let start = rows
            .iter()
            .position(|row| row.first().is_some_and(|c| is_bare_integer(&c.as_text())))
            .ok_or_else(|| MergeError::NoTableFound {
                file: grid.source().to_string(),
            })?;

        let end = rows[start..]
            .iter()
            .position(|row| self.is_total_row(row))
            .map(|offset| start + offset)
            .unwrap_or(rows.len());

        debug!(file = grid.source(), start, end, "located data region");
        Ok(Region { start, end })
    }

    /// Return the trimmed sub-grid
    pub fn locate(&self, grid: &Grid) -> Result<Grid> {
        let region = self.find(grid)?;
        Ok(Grid::new(
            grid.source(),
            grid.rows()[region.start..region.end].to_vec(),
        ))
    }

    fn is_total_row(&self, row: &Row) -> bool {
        row.iter()
            .any(|cell| cell.as_text().to_lowercase().contains(&self.marker))
    }
}

impl Default for TableLocator {
    fn default() -> Self {
        Self::new(TOTAL_MARKER)
    }
}
