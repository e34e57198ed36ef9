/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data. The `*Detail` types are the
 * denormalized shapes served by the REST API.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lexicon_code::LexiconCode;

/// Lexicon record (a source/destination language pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub src_language: String,
    pub dst_language: String,
    /// The `xx-yy` code, also used as the lexicon slug
    pub code: String,
}

impl LexiconRecord {
    pub fn new(id: i64, name: String, description: String, src_language: String, dst_language: String) -> Self {
        let code = LexiconCode::new(&src_language, &dst_language).to_string();
        Self {
            id,
            name,
            description,
            src_language,
            dst_language,
            code,
        }
    }
}

/// Word record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: i64,
    pub lexicon_id: i64,
    pub term: String,
    pub slug: String,
    pub etimol: String,
}

/// Grammatical category record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GramcatRecord {
    pub id: i64,
    pub abbreviation: String,
    pub title: String,
}

/// Region record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: i64,
    pub name: String,
}

/// Diatopic variation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationRecord {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    pub region_id: i64,
}

/// Entry to be inserted, with its dependent rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEntry {
    pub translation: String,
    pub variation_id: Option<i64>,
    /// Gramcat ids, in display order
    pub gramcat_ids: Vec<i64>,
    pub examples: Vec<String>,
    pub conjugation: Option<ConjugationDetail>,
}

/// Verbal conjugation attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConjugationDetail {
    /// Free text before the first tense label
    pub intro: String,
    /// Cell content as imported
    pub raw: String,
    /// Forms keyed by lowercase tense label
    pub conjugation: BTreeMap<String, String>,
}

/// Entry as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub id: i64,
    pub translation: String,
    pub gramcats: Vec<String>,
    pub variation: Option<String>,
    pub examples: Vec<String>,
    pub conjugation: Option<ConjugationDetail>,
}

/// Word with its entries, as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    pub id: i64,
    pub lexicon: String,
    pub term: String,
    pub slug: String,
    pub etimol: String,
    pub entries: Vec<EntryDetail>,
}

/// Row of the `export-data` CSV
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntryRow {
    pub term: String,
    pub gramcats: Vec<String>,
    pub translation: String,
    pub examples: Vec<String>,
    pub conjugation: Option<String>,
}

/// Build the URL slug of a term
///
/// Whitespace, `-` and `_` collapse into a single `-`; other non-alphanumeric
/// characters are dropped.
pub fn slugify(term: &str) -> String {
    let mut slug = String::with_capacity(term.len());
    let mut pending_dash = false;

    for c in term.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}
