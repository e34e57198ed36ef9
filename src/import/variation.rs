/*!
 * Diatopic variation importer.
 *
 * Adds regional translations to words already present in a lexicon. Each row
 * becomes one entry tied to the variation.
 */

use anyhow::Result;
use log::{info, warn};

use super::sheet::Workbook;
use super::{resolve_gramcats, row_progress, ImportReport, RowError};
use crate::app_config::ImportConfig;
use crate::database::models::NewEntry;
use crate::database::{DatabaseConnection, Repository, TxOutcome};
use crate::errors::{ImportError, LexiconError};
use crate::lexicon_code::LexiconCode;

const TERM: usize = 0;
const GRAMCATS: usize = 1;
const TRANSLATION: usize = 2;

/// Options of an `import-variation` run
#[derive(Debug, Clone)]
pub struct VariationImportOptions {
    pub lexicon_code: LexiconCode,
    /// Name of the diatopic variation; only optional for dry runs
    pub variation: Option<String>,
    pub dry_run: bool,
}

pub struct VariationImporter<'a> {
    config: &'a ImportConfig,
}

impl<'a> VariationImporter<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        db: &DatabaseConnection,
        workbook: &Workbook,
        options: &VariationImportOptions,
    ) -> Result<ImportReport> {
        if options.variation.is_none() && !options.dry_run {
            return Err(ImportError::MissingVariation.into());
        }

        db.atomic(|tx| {
            let lexicon = Repository::find_lexicon_by_code(tx, &options.lexicon_code)?
                .ok_or_else(|| LexiconError::LexiconNotFound(options.lexicon_code.to_string()))?;

            let variation = match &options.variation {
                Some(name) => match Repository::find_variation_by_name(tx, name)? {
                    Some(variation) => Some(variation),
                    None if options.dry_run => {
                        warn!("Unknown diatopic variation '{}', only validating rows", name);
                        None
                    }
                    None => return Err(LexiconError::VariationNotFound(name.clone()).into()),
                },
                None => None,
            };

            let known_gramcats = Repository::gramcat_ids(tx)?;
            let mut report = ImportReport {
                dry_run: options.dry_run,
                ..Default::default()
            };

            let rows: Vec<_> = workbook
                .sheets
                .iter()
                .flat_map(|sheet| sheet.data_rows())
                .collect();
            // trailing empty rows are ignored, gaps are not
            let last_filled = rows.iter().rposition(|row| !row.is_empty());
            let progress = row_progress(rows.len(), "Importing variation");

            for (index, row) in rows.iter().enumerate() {
                progress.inc(1);
                if last_filled.is_none_or(|last| index > last) {
                    report.skipped_rows += 1;
                    continue;
                }

                let term = row.cell(TERM);
                let mut error = RowError::new(row.number, term);

                if row.is_empty() {
                    error.set("term", "Row is empty");
                    report.errors.push(error);
                    if report.errors.len() >= self.config.max_errors {
                        break;
                    }
                    continue;
                }

                let word = match term {
                    Some(term) => Repository::find_word(tx, lexicon.id, term)?,
                    None => None,
                };
                if word.is_none() {
                    error.set("term", "Word not found in lexicon");
                }

                let translation = row.cell(TRANSLATION);
                if translation.is_none() {
                    error.set("translation", "Translation is required");
                }

                let gramcat_ids = match (row.cell(GRAMCATS), &word) {
                    (None, Some(word)) => Repository::common_gramcat_ids(tx, word.id)?,
                    (None, None) => Vec::new(),
                    (cell, _) => resolve_gramcats(cell, &known_gramcats).unwrap_or_else(|message| {
                        error.set("gramcats", message);
                        Vec::new()
                    }),
                };

                if error.has_errors() {
                    report.errors.push(error);
                    if report.errors.len() >= self.config.max_errors {
                        warn!("Too many errors ({}), stopping validation", report.errors.len());
                        break;
                    }
                    continue;
                }

                if let (Some(word), Some(variation)) = (&word, &variation) {
                    Repository::insert_entry(
                        tx,
                        word.id,
                        &NewEntry {
                            translation: translation.unwrap_or_default().to_string(),
                            variation_id: Some(variation.id),
                            gramcat_ids,
                            ..Default::default()
                        },
                    )?;
                    report.entries += 1;
                }
            }

            progress.finish_and_clear();

            let outcome = if report.is_valid() && !options.dry_run {
                report.committed = true;
                info!(
                    "Imported {} entries of variation {}",
                    report.entries,
                    options.variation.as_deref().unwrap_or_default()
                );
                TxOutcome::Commit
            } else {
                TxOutcome::Rollback
            };
            Ok((report, outcome))
        })
    }
}
