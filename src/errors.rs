/*!
 * Error types for the linguatec-lexicon application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Row validation
 * failures are not errors: they are collected as data in an import report.
 */

use thiserror::Error;

/// Errors raised while looking up lexicon reference data
#[derive(Error, Debug)]
pub enum LexiconError {
    /// The lexicon code is not of the form `xx-yy`
    #[error(
        "Lexicon code format should be 'en-es' where 'en' is the language source and 'es' is the language destination ISO 639 code."
    )]
    InvalidCode(String),

    /// No lexicon with that code
    #[error("There is not a lexicon with that code: {0}")]
    LexiconNotFound(String),

    /// No diatopic variation with that name
    #[error("There is not a diatopic variation with that name: {0}")]
    VariationNotFound(String),

    /// No region with that name
    #[error("There is not a region with that name: {0}")]
    RegionNotFound(String),
}

/// Errors that abort an import before or after row validation
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input file could not be opened or decoded
    #[error("Failed to read spreadsheet {path}: {message}")]
    Spreadsheet {
        /// Path of the offending file
        path: String,
        /// Reader error message
        message: String,
    },

    /// The input file extension is not supported
    #[error("Unsupported input file type: {0}")]
    UnsupportedFormat(String),

    /// The batch had validation errors and was rolled back
    #[error("Import rejected: {0} validation error(s), no data was imported")]
    Rejected(usize),

    /// A diatopic variation is required for a real import
    #[error("A diatopic variation is required (use --variation)")]
    MissingVariation,

    /// Conversion to ODS through the office suite failed
    #[error("Error during conversion to ODS: {0}")]
    Conversion(String),

    /// The ODS document could not be parsed
    #[error("Failed to parse ODS document: {0}")]
    Ods(String),

    /// Lookup of reference data failed
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

/// Errors that can occur while exporting to CSV
#[derive(Error, Debug)]
pub enum ExportError {
    /// Exporters never overwrite files
    #[error("A csv with that name already exists: {0}")]
    FileExists(String),

    /// Lookup of reference data failed
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an import
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Error from an export
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Error from lexicon lookups
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
