/*!
 * Batch importers: spreadsheet → database.
 *
 * Every importer validates rows, maps columns to records and writes them
 * inside ONE transaction. Any row error, or a dry run, rolls the whole batch
 * back. Row errors are reported as data in an [`ImportReport`].
 */

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod conjugation;
pub mod data;
pub mod gramcat;
pub mod mono;
pub mod ods;
pub mod sheet;
pub mod variation;

pub use data::{DataImportOptions, DataImporter};
pub use gramcat::GramcatImporter;
pub use mono::{MonoImportOptions, MonoImporter};
pub use sheet::{Sheet, SheetRow, Workbook};
pub use variation::{VariationImportOptions, VariationImporter};

/// Validation failures of one spreadsheet row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowError {
    pub row: usize,
    pub term: String,
    /// (column, message) pairs; one message per column
    pub errors: Vec<(String, String)>,
}

impl RowError {
    pub fn new(row: usize, term: Option<&str>) -> Self {
        Self {
            row,
            term: term.unwrap_or_default().to_string(),
            errors: Vec::new(),
        }
    }

    /// Record a message for a column, replacing an earlier one
    pub fn set(&mut self, column: &str, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(c, _)| c == column) {
            Some(existing) => existing.1 = message,
            None => self.errors.push((column.to_string(), message)),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One line per column, as printed by the CLI and returned by the validators
    pub fn lines(&self) -> Vec<ErrorLine> {
        self.errors
            .iter()
            .map(|(column, message)| ErrorLine {
                word: format!("#{}: {}", self.row, self.term),
                column: column.clone(),
                message: message.clone(),
            })
            .collect()
    }
}

/// Flattened row error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLine {
    pub word: String,
    pub column: String,
    pub message: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub words: usize,
    pub entries: usize,
    pub examples: usize,
    pub conjugations: usize,
    pub gramcats: usize,
    pub skipped_rows: usize,
    pub errors: Vec<RowError>,
    pub dry_run: bool,
    /// Whether the transaction was committed
    pub committed: bool,
}

impl ImportReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_lines(&self) -> Vec<ErrorLine> {
        self.errors.iter().flat_map(RowError::lines).collect()
    }

    /// JSON lines, one per error
    pub fn error_json_lines(&self) -> Vec<String> {
        self.error_lines()
            .iter()
            .filter_map(|line| serde_json::to_string(line).ok())
            .collect()
    }
}

/// Resolve comma-separated gramcat abbreviations against the known ones
///
/// Returns the ids in cell order, or the error message for the gramcats column.
pub fn resolve_gramcats(
    cell: Option<&str>,
    known: &HashMap<String, i64>,
) -> Result<Vec<i64>, String> {
    let cell = match cell {
        Some(cell) => cell,
        None => return Err("Gramatical category is empty".to_string()),
    };

    let mut ids = Vec::new();
    for abbreviation in cell.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        match known.get(abbreviation) {
            Some(id) if !ids.contains(id) => ids.push(*id),
            Some(_) => {}
            None => return Err(format!("'{}' is an invalid gramatical category", abbreviation)),
        }
    }

    if ids.is_empty() {
        return Err("Gramatical category is empty".to_string());
    }
    Ok(ids)
}

/// Progress bar over import rows; indicatif hides it when stderr is not a terminal
pub(crate) fn row_progress(len: usize, message: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("=> "));
    progress_bar.set_message(message.to_string());
    progress_bar
}
