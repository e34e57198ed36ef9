/*!
 * Spreadsheet reading.
 *
 * Every input format is flattened into the same shape: a workbook is an
 * ordered list of sheets, a sheet a list of rows tagged with their 1-based
 * spreadsheet row number, a cell an optional trimmed string.
 */

use anyhow::Result;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use std::path::Path;

use crate::errors::ImportError;
use crate::file_utils::{FileManager, FileType};

/// One spreadsheet row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetRow {
    /// 1-based row number as shown by spreadsheet software
    pub number: usize,
    pub cells: Vec<Option<String>>,
}

impl SheetRow {
    pub fn new(number: usize, cells: Vec<Option<String>>) -> Self {
        Self { number, cells }
    }

    /// Build a row from plain strings; empty strings become empty cells
    pub fn from_strs(number: usize, cells: &[&str]) -> Self {
        Self::new(number, cells.iter().map(|c| normalize_cell(c)).collect())
    }

    /// Cell at a 0-based column index, `None` when empty or out of range
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    /// Whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// One worksheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Rows after the header row
    pub fn data_rows(&self) -> impl Iterator<Item = &SheetRow> {
        self.rows.iter().filter(|row| row.number > 1)
    }

    /// Build a sheet from string rows; the first row is number 1 (the header)
    pub fn from_rows(name: &str, rows: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, cells)| SheetRow::from_strs(i + 1, cells))
                .collect(),
        }
    }
}

/// A set of worksheets read from one file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open an xlsx/xls/ods workbook or a CSV file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let spreadsheet_error = |message: String| ImportError::Spreadsheet {
            path: path.display().to_string(),
            message,
        };

        if !FileManager::file_exists(path) {
            return Err(spreadsheet_error("file does not exist".to_string()));
        }

        match FileManager::detect_file_type(path) {
            FileType::Spreadsheet => Self::open_spreadsheet(path).map_err(spreadsheet_error),
            FileType::Csv => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| spreadsheet_error(e.to_string()))?;
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                Ok(Self::from_sheets(vec![
                    parse_csv_sheet(&name, &content).map_err(spreadsheet_error)?,
                ]))
            }
            FileType::Unknown => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn open_spreadsheet(path: &Path) -> Result<Self, String> {
        let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(|e| e.to_string())?;

            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let rows = range
                .rows()
                .enumerate()
                .map(|(i, row)| {
                    let mut cells = vec![None; col_offset];
                    cells.extend(row.iter().map(data_to_cell));
                    SheetRow::new(row_offset + i + 1, cells)
                })
                .collect::<Vec<_>>();

            debug!("Read sheet '{}' with {} rows", name, rows.len());
            sheets.push(Sheet { name, rows });
        }

        Ok(Self { sheets })
    }

    /// The sheet a monolingual import reads
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// Number of data rows across every sheet
    pub fn data_row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.data_rows().count()).sum()
    }
}

fn normalize_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn data_to_cell(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => normalize_cell(s),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Int(i) => Some(i.to_string()),
        other => normalize_cell(&other.to_string()),
    }
}

/// Parse CSV text into a sheet; the delimiter is `;` when the header has more of them than commas
///
/// Every line is a row, blank ones included, so row numbers match the file.
/// A quoted cell spanning several lines stays one row.
pub fn parse_csv_sheet(name: &str, content: &str) -> Result<Sheet, String> {
    let header = content.lines().next().unwrap_or_default();
    let delimiter = if header.matches(';').count() > header.matches(',').count() {
        ';'
    } else {
        ','
    };

    let content = mark_blank_lines(content, delimiter);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("Failed to parse CSV row {}: {}", i + 1, e))?;
        rows.push(SheetRow::new(
            i + 1,
            record.iter().map(normalize_cell).collect(),
        ));
    }

    Ok(Sheet {
        name: name.to_string(),
        rows,
    })
}

/// Turn blank lines outside quoted fields into a lone delimiter
///
/// The csv reader silently drops blank lines; an empty record keeps them.
fn mark_blank_lines(content: &str, delimiter: char) -> String {
    let mut marked = String::with_capacity(content.len());
    let mut in_quotes = false;

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if !in_quotes && body.trim().is_empty() {
            marked.push(delimiter);
            marked.push_str(&line[body.len()..]);
        } else {
            marked.push_str(line);
        }

        // doubled quotes cancel out
        if body.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }

    marked
}
