// 📂 Sheet Readers
// Polymorphic readers that turn one source file into a raw Grid

use crate::error::{MergeError, Result};
use crate::grid::{Cell, Grid, Row};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceType - which reader handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// xlsx / xlsm / xlsb / xls / ods, read through calamine
    Spreadsheet,
    /// Delimited text export
    Csv,
}

impl SourceType {
    pub fn name(&self) -> &'static str {
        match self {
            SourceType::Spreadsheet => "Spreadsheet",
            SourceType::Csv => "CSV",
        }
    }
}

/// SheetReader - read the first sheet of a file into a Grid
pub trait SheetReader {
    fn read(&self, file_path: &Path) -> Result<Grid>;
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Pick a source type from the file extension
pub fn detect_source(file_path: &Path) -> Result<SourceType> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceType::Spreadsheet),
        "csv" | "txt" => Ok(SourceType::Csv),
        _ => Err(MergeError::unreadable(
            file_name(file_path),
            format!("unsupported file type '.{}'", extension),
        )),
    }
}

pub fn get_reader(source_type: SourceType) -> Box<dyn SheetReader> {
    match source_type {
        SourceType::Spreadsheet => Box::new(SpreadsheetReader::new()),
        SourceType::Csv => Box::new(CsvReader::new()),
    }
}

/// Detect the source type and read the file in one step
pub fn read_grid(file_path: &Path) -> Result<Grid> {
    let source = detect_source(file_path)?;
    debug!(file = %file_path.display(), source = source.name(), "reading source file");
    get_reader(source).read(file_path)
}

pub(crate) fn file_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| file_path.display().to_string())
}

// ============================================================================
// SPREADSHEET READER
// ============================================================================

/// Reads the first worksheet of any calamine-supported workbook
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        SpreadsheetReader
    }

    fn first_sheet(&self, file_path: &Path) -> std::result::Result<Range<Data>, String> {
        match open_workbook_auto(file_path) {
            Ok(mut workbook) => match workbook.worksheet_range_at(0) {
                Some(range) => range.map_err(|e| e.to_string()),
                None => Err("workbook contains no sheets".to_string()),
            },
            Err(first_err) => {
                // Exports are often mislabelled (.xls holding xlsx and vice versa);
                // retry with format sniffing before giving up.
                debug!(file = %file_path.display(), error = %first_err, "extension-based open failed, sniffing content");
                let bytes = std::fs::read(file_path).map_err(|e| e.to_string())?;
                let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
                    .map_err(|e| format!("{} (fallback: {})", first_err, e))?;
                match workbook.worksheet_range_at(0) {
                    Some(range) => range.map_err(|e| e.to_string()),
                    None => Err("workbook contains no sheets".to_string()),
                }
            }
        }
    }
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetReader for SpreadsheetReader {
    fn read(&self, file_path: &Path) -> Result<Grid> {
        let name = file_name(file_path);
        let range = self
            .first_sheet(file_path)
            .map_err(|reason| MergeError::unreadable(name.clone(), reason))?;

        // calamine trims leading blank columns; restore them so column
        // positions match the sheet's own A, B, C... layout
        let (_, start_col) = range.start().unwrap_or((0, 0));
        let pad = start_col as usize;

        let rows: Vec<Row> = range
            .rows()
            .map(|row| {
                let mut cells = vec![Cell::Empty; pad];
                cells.extend(row.iter().map(convert_cell));
                cells
            })
            .collect();

        debug!(file = %name, rows = rows.len(), "read spreadsheet");
        Ok(Grid::new(name, rows))
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Cell::text(e.to_string()),
        // Native date cells become day-first text so date detection sees them
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time() == chrono::NaiveTime::MIN => {
                Cell::text(value.format("%d.%m.%Y").to_string())
            }
            Some(value) => Cell::text(value.format("%d.%m.%Y %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

// ============================================================================
// CSV READER
// ============================================================================

/// Reads a headerless delimited export; the delimiter is sniffed from the
/// first line (`;` when it outnumbers `,`)
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        CsvReader
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetReader for CsvReader {
    fn read(&self, file_path: &Path) -> Result<Grid> {
        use csv::ReaderBuilder;

        let name = file_name(file_path);
        let content = std::fs::read(file_path)
            .map_err(|e| MergeError::unreadable(name.clone(), e))?;
        let content = content
            .strip_prefix("\u{feff}".as_bytes())
            .unwrap_or(&content[..]);

        let first_line = content.split(|b| *b == b'\n').next().unwrap_or(&[]);
        let semicolons = first_line.iter().filter(|b| **b == b';').count();
        let commas = first_line.iter().filter(|b| **b == b',').count();
        let delimiter = if semicolons > commas { b';' } else { b',' };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content);

        let mut rows = Vec::new();
        for (line_num, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                MergeError::unreadable(name.clone(), format!("line {}: {}", line_num + 1, e))
            })?;
            rows.push(record.iter().map(Cell::text).collect());
        }

        debug!(file = %name, rows = rows.len(), "read csv");
        Ok(Grid::new(name, rows))
    }
}

// ============================================================================
// TESTS
// ============================================================================
