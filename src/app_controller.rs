use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::api;
use crate::app_config::Config;
use crate::database::connection::DatabaseStats;
use crate::database::models::{LexiconRecord, RegionRecord, VariationRecord};
use crate::database::{DatabaseConnection, Repository};
use crate::errors::LexiconError;
use crate::export::CsvExporter;
use crate::import::ods::RichTable;
use crate::import::{
    DataImportOptions, DataImporter, GramcatImporter, ImportReport, MonoImportOptions,
    MonoImporter, VariationImportOptions, VariationImporter, Workbook,
};
use crate::lexicon_code::LexiconCode;

// @module: Application controller for lexicon management

/// Main application controller: runs one command against the database
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared SQLite connection
    db: DatabaseConnection,
}

impl Controller {
    /// Create a controller on an in-memory database with default configuration
    pub fn new_for_test() -> Result<Self> {
        Ok(Self::with_database(Config::default(), DatabaseConnection::new_in_memory()?))
    }

    // @method: Open the configured database (or the platform default)
    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.database.path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        debug!("Using database {}", db.path().display());
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: DatabaseConnection) -> Self {
        Self { config, db }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Import the bilingual multi-entry layout from every sheet
    pub fn import_data(&self, input: &Path, options: &DataImportOptions) -> Result<ImportReport> {
        let workbook = Workbook::open(input)?;
        info!("Importing {} into {}", input.display(), options.lexicon_code);

        let report = DataImporter::new(&self.config.import).run(&self.db, &workbook, options)?;
        log_report(&report);
        Ok(report)
    }

    /// Import a monolingual dictionary from the first sheet
    pub fn import_mono(
        &self,
        input: &Path,
        options: &MonoImportOptions,
        etimol_rich_text: bool,
    ) -> Result<ImportReport> {
        let workbook = Workbook::open(input)?;
        info!("Importing {} into {}", input.display(), options.lexicon_code);

        let mut importer = MonoImporter::new(&self.config.import);
        if etimol_rich_text {
            let table = RichTable::load(&self.config.import.office_command, input)?;
            if table.is_empty() {
                warn!("No rich text found in {}", input.display());
            }
            importer = importer.with_rich_etimol(table);
        }

        let report = importer.run(&self.db, &workbook, options)?;
        log_report(&report);
        Ok(report)
    }

    /// Import grammatical categories from a CSV file
    pub fn import_gramcat(&self, input: &Path, purge: bool) -> Result<ImportReport> {
        let workbook = Workbook::open(input)?;
        let report = GramcatImporter::new(purge).run(&self.db, &workbook)?;
        info!("Imported {} gramatical categories", report.gramcats);
        log_report(&report);
        Ok(report)
    }

    /// Import the entries of a diatopic variation
    pub fn import_variation(&self, input: &Path, options: &VariationImportOptions) -> Result<ImportReport> {
        let workbook = Workbook::open(input)?;
        info!("Importing variation entries from {}", input.display());

        let report = VariationImporter::new(&self.config.import).run(&self.db, &workbook, options)?;
        log_report(&report);
        Ok(report)
    }

    // =========================================================================
    // Exports
    // =========================================================================

    pub fn export_data(&self, code: &LexiconCode, output: &Path) -> Result<usize> {
        CsvExporter::new(&self.db).export_data(code, output)
    }

    pub fn export_variation(&self, code: &LexiconCode, variation: &str, output: &Path) -> Result<usize> {
        CsvExporter::new(&self.db).export_variation(code, variation, output)
    }

    /// Export the term list dated today
    pub fn export_terms(&self, code: &LexiconCode, output_dir: &Path) -> Result<PathBuf> {
        CsvExporter::new(&self.db).export_terms(code, output_dir, Local::now().date_naive())
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub fn create_lexicon(&self, name: &str, code: &LexiconCode, description: &str) -> Result<LexiconRecord> {
        let lexicon = self
            .db
            .transaction(|tx| Repository::create_lexicon(tx, name, description, code))?;
        info!("Created lexicon '{}' ({})", lexicon.name, lexicon.code);
        Ok(lexicon)
    }

    pub fn create_region(&self, name: &str) -> Result<RegionRecord> {
        let region = self.db.transaction(|tx| Repository::create_region(tx, name))?;
        info!("Created region '{}'", region.name);
        Ok(region)
    }

    pub fn create_variation(&self, name: &str, abbreviation: &str, region: &str) -> Result<VariationRecord> {
        let variation = self.db.transaction(|tx| {
            let region = Repository::find_region_by_name(tx, region)?
                .ok_or_else(|| LexiconError::RegionNotFound(region.to_string()))?;
            Repository::create_variation(tx, name, abbreviation, region.id)
        })?;
        info!("Created diatopic variation '{}'", variation.name);
        Ok(variation)
    }

    pub fn stats(&self) -> Result<DatabaseStats> {
        self.db.stats()
    }

    // =========================================================================
    // HTTP
    // =========================================================================

    /// Serve the REST API until the server stops
    pub async fn serve(&self) -> Result<()> {
        let repository = Repository::new(self.db.clone());
        api::start_server(repository, self.config.clone())
            .context("Failed to start HTTP server")?
            .await
            .context("HTTP server failed")
    }
}

fn log_report(report: &ImportReport) {
    if report.skipped_rows > 0 {
        info!("Skipped {} empty rows", report.skipped_rows);
    }

    if !report.is_valid() {
        error!(
            "{} row(s) with errors, no data was imported",
            report.errors.len()
        );
    } else if report.dry_run {
        info!(
            "Dry run: {} words, {} entries, {} examples, {} conjugations validated",
            report.words, report.entries, report.examples, report.conjugations
        );
    }
}
