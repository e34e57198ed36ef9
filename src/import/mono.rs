/*!
 * Monolingual dictionary importer.
 *
 * One word per row with its etymology and up to two definitions. Only the
 * first sheet is read.
 */

use anyhow::Result;
use log::{info, warn};

use super::ods::RichTable;
use super::sheet::Workbook;
use super::{row_progress, ImportReport, RowError};
use crate::app_config::ImportConfig;
use crate::database::models::NewEntry;
use crate::database::{DatabaseConnection, Repository, TxOutcome};
use crate::errors::LexiconError;
use crate::lexicon_code::LexiconCode;

const TERM: usize = 0;
// column B holds the source url, which is not stored
const ETIMOL: usize = 2;
const DEFINITION: usize = 4;
const DEFINITION2: usize = 6;

/// Options of an `import-mono` run
#[derive(Debug, Clone)]
pub struct MonoImportOptions {
    pub lexicon_code: LexiconCode,
    /// Delete the lexicon's words before importing
    pub truncate: bool,
    pub dry_run: bool,
}

pub struct MonoImporter<'a> {
    config: &'a ImportConfig,
    rich_etimol: Option<RichTable>,
}

impl<'a> MonoImporter<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self {
            config,
            rich_etimol: None,
        }
    }

    /// Take etymologies from formatted ODS cells instead of plain text
    pub fn with_rich_etimol(mut self, table: RichTable) -> Self {
        self.rich_etimol = Some(table);
        self
    }

    pub fn run(
        &self,
        db: &DatabaseConnection,
        workbook: &Workbook,
        options: &MonoImportOptions,
    ) -> Result<ImportReport> {
        db.atomic(|tx| {
            let lexicon = Repository::find_lexicon_by_code(tx, &options.lexicon_code)?
                .ok_or_else(|| LexiconError::LexiconNotFound(options.lexicon_code.to_string()))?;

            if options.truncate {
                let deleted = Repository::delete_lexicon_words(tx, lexicon.id)?;
                info!("Truncated lexicon {}: {} words deleted", options.lexicon_code, deleted);
            }

            let mut terms = Repository::lexicon_terms(tx, lexicon.id)?;
            let mut report = ImportReport {
                dry_run: options.dry_run,
                ..Default::default()
            };

            let Some(sheet) = workbook.first_sheet() else {
                warn!("The workbook has no sheets");
                return Ok((report, TxOutcome::Rollback));
            };

            let progress = row_progress(sheet.data_rows().count(), "Importing words");

            for row in sheet.data_rows() {
                progress.inc(1);

                if row.is_empty() {
                    info!("Skipping empty row {}", row.number);
                    report.skipped_rows += 1;
                    continue;
                }

                let term = row.cell(TERM);
                let definitions: Vec<&str> = [DEFINITION, DEFINITION2]
                    .iter()
                    .filter_map(|col| row.cell(*col))
                    .collect();

                let mut error = RowError::new(row.number, term);
                match term {
                    None => error.set("term", "Term is required"),
                    Some(term) if terms.contains(term) => error.set("term", "This term already exists"),
                    Some(_) => {}
                }
                if row.cell(DEFINITION).is_none() {
                    error.set("definition", "Definition is required");
                }

                if error.has_errors() {
                    report.errors.push(error);
                    if report.errors.len() >= self.config.max_errors {
                        warn!("Too many errors ({}), stopping validation", report.errors.len());
                        break;
                    }
                    continue;
                }

                let term = term.unwrap_or_default();
                let etimol = self
                    .rich_etimol
                    .as_ref()
                    .and_then(|table| table.cell(row.number, ETIMOL))
                    .or_else(|| row.cell(ETIMOL))
                    .unwrap_or_default();

                let word_id = Repository::insert_word(tx, lexicon.id, term, etimol)?;
                terms.insert(term.to_string());
                report.words += 1;

                for definition in definitions {
                    Repository::insert_entry(
                        tx,
                        word_id,
                        &NewEntry {
                            translation: definition.to_string(),
                            ..Default::default()
                        },
                    )?;
                    report.entries += 1;
                }
            }

            progress.finish_and_clear();

            let outcome = if report.is_valid() && !options.dry_run {
                report.committed = true;
                info!("Imported {} words into {}", report.words, options.lexicon_code);
                TxOutcome::Commit
            } else {
                TxOutcome::Rollback
            };
            Ok((report, outcome))
        })
    }
}
