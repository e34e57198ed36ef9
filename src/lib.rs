/*!
 * # linguatec-lexicon
 *
 * An online bilingual dictionary (Spanish → Aragonese and friends) with the
 * tooling to maintain it from spreadsheets.
 *
 * ## Features
 *
 * - Read-only REST API over lexicons, words, and grammatical categories
 * - Exact, prefix, and "near" (similar spelling) term search
 * - All-or-nothing spreadsheet imports (xlsx, xls, ods, csv):
 *   - bilingual multi-entry data with examples and verbal conjugations
 *   - monolingual dictionaries, optionally keeping italic etymology markup
 *   - grammatical categories
 *   - diatopic (regional) variations
 * - Upload validators that dry-run an import and report row errors
 * - CSV exports that round-trip with the importers
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `app_controller`: Runs one command against the database
 * - `database`: SQLite schema, connection, and repository
 * - `import`: Spreadsheet readers and importers
 * - `export`: CSV exporters
 * - `api`: actix-web handlers, pagination, and validators
 * - `lexicon_code`: `xx-yy` lexicon codes
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod api;
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod import;
pub mod lexicon_code;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use database::{DatabaseConnection, Repository};
pub use errors::{AppError, ExportError, ImportError, LexiconError};
pub use import::{ImportReport, Workbook};
pub use lexicon_code::LexiconCode;
