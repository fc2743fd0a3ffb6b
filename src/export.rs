// 💾 Exporter
// Flat delimited text: UTF-8 with BOM, no header row

use crate::error::{MergeError, Result};
use crate::temporal::TypedTable;
use csv::WriterBuilder;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Write rows in their current order; returns the number of rows written
pub fn write_table<W: Write>(table: &TypedTable, out: W, delimiter: u8) -> std::io::Result<usize> {
    let mut out = out;
    out.write_all(BOM)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(out);

    for typed in &table.rows {
        writer.write_record(typed.row.fields().map(|f| f.into_owned()))?;
    }
    writer.flush()?;

    Ok(table.rows.len())
}

/// Write the table to `path`. Rows are staged in a sibling temp file and
/// renamed into place, so a failed write never leaves a partial file at
/// `path`. The table is left untouched for the caller; nothing is retried.
pub fn export(table: &TypedTable, path: &Path, delimiter: u8) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // removed on drop unless persisted
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| MergeError::output(path, e))?;
    debug!(temp = %staged.path().display(), "staging output");

    let written = write_table(table, BufWriter::new(staged.as_file_mut()), delimiter)
        .map_err(|e| MergeError::output(path, e))?;
    staged
        .persist(path)
        .map_err(|e| MergeError::output(path, e.error))?;

    info!(path = %path.display(), rows = written, "wrote output");
    Ok(written)
}
