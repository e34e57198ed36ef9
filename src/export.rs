/*!
 * CSV exporters.
 *
 * `export-data` writes the layout `import-data` reads, so a lexicon can be
 * edited in a spreadsheet and imported again. No exporter overwrites an
 * existing file.
 */

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::database::models::{ExportEntryRow, LexiconRecord};
use crate::database::{DatabaseConnection, Repository};
use crate::errors::{ExportError, LexiconError};
use crate::file_utils::FileManager;
use crate::lexicon_code::LexiconCode;

pub const DATA_HEADER: [&str; 5] = ["term", "gramcats", "translation", "examples", "conjugation"];
pub const VARIATION_HEADER: [&str; 3] = ["term", "gramcats", "translation"];
pub const TERMS_HEADER: [&str; 3] = ["id", "slug", "term"];

const GRAMCAT_SEPARATOR: &str = ", ";
const EXAMPLE_SEPARATOR: &str = " // ";

/// Exports lexicon content to CSV files
pub struct CsvExporter<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CsvExporter<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Common entries of a lexicon; returns the number of lines written
    pub fn export_data(&self, code: &LexiconCode, output: &Path) -> Result<usize> {
        let lexicon = self.lexicon(code)?;
        let rows = self
            .db
            .execute(|conn| Repository::export_entries(conn, lexicon.id, None))?;

        let mut writer = semicolon_writer(create_new(output)?);
        writer.write_record(DATA_HEADER).map_err(ExportError::from)?;
        for row in &rows {
            writer
                .write_record(data_record(row))
                .map_err(ExportError::from)?;
        }
        writer.flush()?;

        info!("Exported {} entries of {} to {}", rows.len(), code, output.display());
        Ok(rows.len())
    }

    /// Entries of one diatopic variation
    pub fn export_variation(&self, code: &LexiconCode, variation: &str, output: &Path) -> Result<usize> {
        let lexicon = self.lexicon(code)?;
        let variation = self
            .db
            .execute(|conn| Repository::find_variation_by_name(conn, variation))?
            .ok_or_else(|| ExportError::from(LexiconError::VariationNotFound(variation.to_string())))?;

        let rows = self
            .db
            .execute(|conn| Repository::export_entries(conn, lexicon.id, Some(variation.id)))?;

        let mut writer = semicolon_writer(create_new(output)?);
        writer.write_record(VARIATION_HEADER).map_err(ExportError::from)?;
        for row in &rows {
            writer
                .write_record([
                    row.term.as_str(),
                    &row.gramcats.join(GRAMCAT_SEPARATOR),
                    &row.translation,
                ])
                .map_err(ExportError::from)?;
        }
        writer.flush()?;

        info!(
            "Exported {} entries of variation {} to {}",
            rows.len(),
            variation.name,
            output.display()
        );
        Ok(rows.len())
    }

    /// `id,slug,term` listing to `terms-<code>-<date>.csv` in a directory
    pub fn export_terms(&self, code: &LexiconCode, output_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        let lexicon = self.lexicon(code)?;
        let words = self
            .db
            .execute(|conn| Repository::lexicon_words(conn, lexicon.id))?;

        FileManager::ensure_dir(output_dir)?;
        let output = FileManager::terms_export_path(output_dir, &code.to_string(), date);

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(create_new(&output)?);
        writer.write_record(TERMS_HEADER).map_err(ExportError::from)?;
        for word in &words {
            writer
                .write_record([word.id.to_string().as_str(), &word.slug, &word.term])
                .map_err(ExportError::from)?;
        }
        writer.flush()?;

        info!("Exported {} terms of {} to {}", words.len(), code, output.display());
        Ok(output)
    }

    fn lexicon(&self, code: &LexiconCode) -> Result<LexiconRecord> {
        Ok(self
            .db
            .execute(|conn| Repository::find_lexicon_by_code(conn, code))?
            .ok_or_else(|| ExportError::from(LexiconError::LexiconNotFound(code.to_string())))?)
    }
}

fn data_record(row: &ExportEntryRow) -> [String; 5] {
    [
        row.term.clone(),
        row.gramcats.join(GRAMCAT_SEPARATOR),
        row.translation.clone(),
        row.examples.join(EXAMPLE_SEPARATOR),
        row.conjugation.clone().unwrap_or_default(),
    ]
}

fn semicolon_writer(file: File) -> csv::Writer<File> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file)
}

/// Create the output file, failing when it already exists
fn create_new(path: &Path) -> Result<File> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(ExportError::FileExists(path.display().to_string()).into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to create {}", path.display())),
    }
}
