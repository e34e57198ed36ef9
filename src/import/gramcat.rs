use anyhow::Result;
use log::info;

use super::sheet::Workbook;
use super::{ImportReport, RowError};
use crate::database::{DatabaseConnection, Repository, TxOutcome};

const ABBREVIATION: usize = 0;
const TITLE: usize = 1;

/// Importer for grammatical categories (`abbreviation,title` rows)
pub struct GramcatImporter {
    purge: bool,
}

impl GramcatImporter {
    pub fn new(purge: bool) -> Self {
        Self { purge }
    }

    pub fn run(&self, db: &DatabaseConnection, workbook: &Workbook) -> Result<ImportReport> {
        let rows = workbook
            .first_sheet()
            .map(|sheet| sheet.rows.as_slice())
            .unwrap_or_default();

        db.atomic(|tx| {
            let mut report = ImportReport::default();

            if self.purge {
                let purged = Repository::purge_gramcats(tx)?;
                info!("Purged {} gramatical categories", purged);
            }

            for row in rows {
                if row.is_empty() {
                    report.skipped_rows += 1;
                    continue;
                }

                let abbreviation = row.cell(ABBREVIATION);
                // optional header
                if row.number == 1 && abbreviation.is_some_and(|a| a.eq_ignore_ascii_case("abbreviation")) {
                    continue;
                }

                match (abbreviation, row.cell(TITLE)) {
                    (Some(abbreviation), Some(title)) => {
                        Repository::upsert_gramcat(tx, abbreviation, title)?;
                        report.gramcats += 1;
                    }
                    (abbreviation, title) => {
                        let mut error = RowError::new(row.number, abbreviation);
                        if abbreviation.is_none() {
                            error.set("abbreviation", "Abbreviation is required");
                        }
                        if title.is_none() {
                            error.set("title", "Title is required");
                        }
                        report.errors.push(error);
                    }
                }
            }

            let outcome = if report.is_valid() {
                report.committed = true;
                TxOutcome::Commit
            } else {
                TxOutcome::Rollback
            };
            Ok((report, outcome))
        })
    }
}
