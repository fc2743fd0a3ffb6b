// 🧹 Row Filter
// Keeps only genuine data records: non-blank rows whose first cell is a bare
// integer

use crate::grid::{is_bare_integer, Grid, Row};
use tracing::debug;

/// True when the row is a data record
pub fn is_record(row: &Row) -> bool {
    if row.iter().all(|c| c.is_blank()) {
        return false;
    }
    row.first().is_some_and(|c| is_bare_integer(&c.as_text()))
}

/// Drop blank rows and rows without a leading index; order is preserved
pub fn filter_rows(grid: Grid) -> Grid {
    let source = grid.source().to_string();
    let before = grid.len();
    let rows: Vec<Row> = grid.into_rows().into_iter().filter(is_record).collect();

    debug!(file = %source, kept = rows.len(), dropped = before - rows.len(), "filtered rows");
    Grid::new(source, rows)
}
