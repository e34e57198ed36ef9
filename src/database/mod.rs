/*!
 * Database module for persistent storage of lexicons.
 *
 * This module provides SQLite-based persistence for:
 * - Lexicons, words and their entries
 * - Grammatical categories
 * - Regions and diatopic variations
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, TxOutcome};
pub use repository::{NearWord, Page, Repository};
