/*!
 * Bilingual data importer.
 *
 * Reads every sheet of a workbook (typically one sheet per letter). Rows
 * sharing a term become one word with one entry per row.
 */

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use super::conjugation::{is_verb_gramcat, missing_tenses, parse_conjugation};
use super::sheet::{SheetRow, Workbook};
use super::{resolve_gramcats, row_progress, ImportReport, RowError};
use crate::app_config::ImportConfig;
use crate::database::models::NewEntry;
use crate::database::{DatabaseConnection, Repository, TxOutcome};
use crate::errors::LexiconError;
use crate::lexicon_code::LexiconCode;

const TERM: usize = 0;
const GRAMCATS: usize = 1;
const TRANSLATION: usize = 2;
const EXAMPLES: usize = 3;
const CONJUGATION: usize = 4;

/// Separator between several examples in one cell
pub const EXAMPLE_SEPARATOR: &str = "//";

/// Options of an `import-data` run
#[derive(Debug, Clone)]
pub struct DataImportOptions {
    pub lexicon_code: LexiconCode,
    /// Validate only, never commit
    pub dry_run: bool,
    /// Accept conjugations lacking some tenses
    pub allow_partial: bool,
}

/// Importer for the bilingual multi-entry layout
pub struct DataImporter<'a> {
    config: &'a ImportConfig,
}

/// Row that passed validation
struct ValidRow {
    term: String,
    entry: NewEntry,
}

impl<'a> DataImporter<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// Import a workbook into a lexicon
    pub fn run(
        &self,
        db: &DatabaseConnection,
        workbook: &Workbook,
        options: &DataImportOptions,
    ) -> Result<ImportReport> {
        db.atomic(|tx| {
            let lexicon = Repository::find_lexicon_by_code(tx, &options.lexicon_code)?
                .ok_or_else(|| LexiconError::LexiconNotFound(options.lexicon_code.to_string()))?;

            let known_gramcats = Repository::gramcat_ids(tx)?;
            let verb_ids: HashSet<i64> = known_gramcats
                .iter()
                .filter(|(abbreviation, _)| is_verb_gramcat(abbreviation))
                .map(|(_, id)| *id)
                .collect();
            let stored_terms = Repository::lexicon_terms(tx, lexicon.id)?;

            let mut report = ImportReport {
                dry_run: options.dry_run,
                ..Default::default()
            };
            let mut batch_words: HashMap<String, i64> = HashMap::new();
            let mut seen: HashSet<(String, Vec<i64>, String)> = HashSet::new();

            let progress = row_progress(workbook.data_row_count(), "Importing data");

            'sheets: for sheet in &workbook.sheets {
                debug!("Processing sheet '{}'", sheet.name);

                for row in sheet.data_rows() {
                    progress.inc(1);

                    if row.is_empty() {
                        report.skipped_rows += 1;
                        continue;
                    }

                    let valid = match self.validate_row(
                        row,
                        &known_gramcats,
                        &verb_ids,
                        &stored_terms,
                        &mut seen,
                        options,
                    ) {
                        Ok(valid) => valid,
                        Err(error) => {
                            report.errors.push(error);
                            if report.errors.len() >= self.config.max_errors {
                                warn!("Too many errors ({}), stopping validation", report.errors.len());
                                break 'sheets;
                            }
                            continue;
                        }
                    };

                    let word_id = match batch_words.get(&valid.term) {
                        Some(id) => *id,
                        None => {
                            let id = Repository::insert_word(tx, lexicon.id, &valid.term, "")?;
                            batch_words.insert(valid.term.clone(), id);
                            report.words += 1;
                            id
                        }
                    };

                    Repository::insert_entry(tx, word_id, &valid.entry)?;
                    report.entries += 1;
                    report.examples += valid.entry.examples.len();
                    if valid.entry.conjugation.is_some() {
                        report.conjugations += 1;
                    }
                }
            }

            progress.finish_and_clear();

            let outcome = if report.is_valid() && !options.dry_run {
                report.committed = true;
                info!(
                    "Imported {} words and {} entries into {}",
                    report.words, report.entries, options.lexicon_code
                );
                TxOutcome::Commit
            } else {
                TxOutcome::Rollback
            };

            Ok((report, outcome))
        })
    }

    fn validate_row(
        &self,
        row: &SheetRow,
        known_gramcats: &HashMap<String, i64>,
        verb_ids: &HashSet<i64>,
        stored_terms: &HashSet<String>,
        seen: &mut HashSet<(String, Vec<i64>, String)>,
        options: &DataImportOptions,
    ) -> Result<ValidRow, RowError> {
        let term = row.cell(TERM);
        let translation = row.cell(TRANSLATION);
        let mut error = RowError::new(row.number, term);

        match term {
            None => error.set("term", "Term is required"),
            Some(term) if stored_terms.contains(term) => {
                error.set("term", "Term already exists in lexicon")
            }
            Some(_) => {}
        }

        let gramcat_ids = match resolve_gramcats(row.cell(GRAMCATS), known_gramcats) {
            Ok(ids) => ids,
            Err(message) => {
                error.set("gramcats", message);
                Vec::new()
            }
        };

        if translation.is_none() {
            error.set("translation", "Translation is required");
        }

        let conjugation = row.cell(CONJUGATION).map(parse_conjugation);
        if let Some(conjugation) = &conjugation {
            if !gramcat_ids.is_empty() && !gramcat_ids.iter().any(|id| verb_ids.contains(id)) {
                error.set(
                    "conjugation",
                    "Verbal conjugation requires a verb gramatical category",
                );
            } else {
                let missing = missing_tenses(conjugation);
                if !missing.is_empty() && !options.allow_partial {
                    error.set(
                        "conjugation",
                        format!("Verbal conjugation is incomplete (missing: {})", missing.join(", ")),
                    );
                }
            }
        }

        if error.has_errors() {
            return Err(error);
        }

        let term = term.unwrap_or_default().to_string();
        let translation = translation.unwrap_or_default().to_string();

        let mut key_gramcats = gramcat_ids.clone();
        key_gramcats.sort_unstable();
        if !seen.insert((term.clone(), key_gramcats, translation.clone())) {
            error.set(
                "translation",
                "Duplicated term, gramatical category and translation",
            );
            return Err(error);
        }

        let examples = row
            .cell(EXAMPLES)
            .map(|cell| {
                cell.split(EXAMPLE_SEPARATOR)
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ValidRow {
            term,
            entry: NewEntry {
                translation,
                variation_id: None,
                gramcat_ids,
                examples,
                conjugation,
            },
        })
    }
}
