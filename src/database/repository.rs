/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 *
 * The synchronous associated functions take a `&Connection` so importers can
 * run them inside one transaction; the async methods wrap them for the HTTP
 * handlers.
 */

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::connection::DatabaseConnection;
use super::models::{
    slugify, ConjugationDetail, EntryDetail, ExportEntryRow, GramcatRecord, LexiconRecord,
    NewEntry, RegionRecord, VariationRecord, WordDetail, WordRecord,
};
use crate::lexicon_code::LexiconCode;

/// Word proposed by the `near` search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearWord {
    pub id: i64,
    pub term: String,
    pub lexicon: String,
    #[serde(skip)]
    pub similarity: f64,
}

/// A page of results plus the total count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}

const WORD_COLUMNS: &str = "id, lexicon_id, term, slug, etimol";

fn parse_lexicon_row(row: &Row) -> rusqlite::Result<LexiconRecord> {
    Ok(LexiconRecord::new(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn parse_word_row(row: &Row) -> rusqlite::Result<WordRecord> {
    Ok(WordRecord {
        id: row.get(0)?,
        lexicon_id: row.get(1)?,
        term: row.get(2)?,
        slug: row.get(3)?,
        etimol: row.get(4)?,
    })
}

fn parse_gramcat_row(row: &Row) -> rusqlite::Result<GramcatRecord> {
    Ok(GramcatRecord {
        id: row.get(0)?,
        abbreviation: row.get(1)?,
        title: row.get(2)?,
    })
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Lexicon Operations
    // =========================================================================

    /// Create a lexicon
    pub fn create_lexicon(
        conn: &Connection,
        name: &str,
        description: &str,
        code: &LexiconCode,
    ) -> Result<LexiconRecord> {
        conn.execute(
            "INSERT INTO lexicons (name, description, src_language, dst_language) VALUES (?1, ?2, ?3, ?4)",
            params![name, description, code.src_language, code.dst_language],
        )
        .with_context(|| format!("Failed to create lexicon {}", code))?;

        Ok(LexiconRecord::new(
            conn.last_insert_rowid(),
            name.to_string(),
            description.to_string(),
            code.src_language.clone(),
            code.dst_language.clone(),
        ))
    }

    /// Find a lexicon by its `xx-yy` code
    pub fn find_lexicon_by_code(
        conn: &Connection,
        code: &LexiconCode,
    ) -> Result<Option<LexiconRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, name, description, src_language, dst_language FROM lexicons
                 WHERE src_language = ?1 AND dst_language = ?2",
                params![code.src_language, code.dst_language],
                parse_lexicon_row,
            )
            .optional()?)
    }

    /// Get a lexicon by id
    pub fn get_lexicon(conn: &Connection, id: i64) -> Result<Option<LexiconRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, name, description, src_language, dst_language FROM lexicons WHERE id = ?1",
                [id],
                parse_lexicon_row,
            )
            .optional()?)
    }

    fn list_lexicons(conn: &Connection, limit: usize, offset: usize) -> Result<Page<LexiconRecord>> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM lexicons", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT id, name, description, src_language, dst_language FROM lexicons
             ORDER BY name, id LIMIT ?1 OFFSET ?2",
        )?;
        let items = stmt
            .query_map(params![limit as i64, offset as i64], parse_lexicon_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            count: count as usize,
            items,
        })
    }

    // =========================================================================
    // Grammatical Category Operations
    // =========================================================================

    /// Insert a gramcat or update the title of an existing abbreviation
    pub fn upsert_gramcat(conn: &Connection, abbreviation: &str, title: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO gramcats (abbreviation, title) VALUES (?1, ?2)
             ON CONFLICT(abbreviation) DO UPDATE SET title = excluded.title",
            params![abbreviation, title],
        )?;

        let id = conn.query_row(
            "SELECT id FROM gramcats WHERE abbreviation = ?1",
            [abbreviation],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Delete every gramcat (entry links cascade)
    pub fn purge_gramcats(conn: &Connection) -> Result<usize> {
        Ok(conn.execute("DELETE FROM gramcats", [])?)
    }

    /// Map of abbreviation to gramcat id
    pub fn gramcat_ids(conn: &Connection) -> Result<HashMap<String, i64>> {
        let mut stmt = conn.prepare("SELECT abbreviation, id FROM gramcats")?;
        let map = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<HashMap<String, i64>>>()?;
        Ok(map)
    }

    fn get_gramcat(conn: &Connection, id: i64) -> Result<Option<GramcatRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, abbreviation, title FROM gramcats WHERE id = ?1",
                [id],
                parse_gramcat_row,
            )
            .optional()?)
    }

    fn find_gramcat_by_abbreviation(
        conn: &Connection,
        abbreviation: &str,
    ) -> Result<Option<GramcatRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, abbreviation, title FROM gramcats WHERE abbreviation = ?1",
                [abbreviation],
                parse_gramcat_row,
            )
            .optional()?)
    }

    fn list_gramcats(conn: &Connection, limit: usize, offset: usize) -> Result<Page<GramcatRecord>> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM gramcats", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT id, abbreviation, title FROM gramcats ORDER BY abbreviation LIMIT ?1 OFFSET ?2",
        )?;
        let items = stmt
            .query_map(params![limit as i64, offset as i64], parse_gramcat_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            count: count as usize,
            items,
        })
    }

    // =========================================================================
    // Region and Diatopic Variation Operations
    // =========================================================================

    /// Create a region
    pub fn create_region(conn: &Connection, name: &str) -> Result<RegionRecord> {
        conn.execute("INSERT INTO regions (name) VALUES (?1)", [name])
            .with_context(|| format!("Failed to create region {}", name))?;

        Ok(RegionRecord {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Find a region by name
    pub fn find_region_by_name(conn: &Connection, name: &str) -> Result<Option<RegionRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, name FROM regions WHERE name = ?1",
                [name],
                |row| {
                    Ok(RegionRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    /// Create a diatopic variation in a region
    pub fn create_variation(
        conn: &Connection,
        name: &str,
        abbreviation: &str,
        region_id: i64,
    ) -> Result<VariationRecord> {
        conn.execute(
            "INSERT INTO diatopic_variations (name, abbreviation, region_id) VALUES (?1, ?2, ?3)",
            params![name, abbreviation, region_id],
        )
        .with_context(|| format!("Failed to create diatopic variation {}", name))?;

        Ok(VariationRecord {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            region_id,
        })
    }

    /// Find a diatopic variation by name
    pub fn find_variation_by_name(
        conn: &Connection,
        name: &str,
    ) -> Result<Option<VariationRecord>> {
        Ok(conn
            .query_row(
                "SELECT id, name, abbreviation, region_id FROM diatopic_variations WHERE name = ?1",
                [name],
                |row| {
                    Ok(VariationRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        abbreviation: row.get(2)?,
                        region_id: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    // =========================================================================
    // Word and Entry Operations
    // =========================================================================

    /// Insert a word and return its id
    pub fn insert_word(conn: &Connection, lexicon_id: i64, term: &str, etimol: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO words (lexicon_id, term, slug, etimol, term_folded) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![lexicon_id, term, slugify(term), etimol, term.to_lowercase()],
        )
        .with_context(|| format!("Failed to insert word {}", term))?;
        Ok(conn.last_insert_rowid())
    }

    /// Find a word of a lexicon by exact term
    pub fn find_word(conn: &Connection, lexicon_id: i64, term: &str) -> Result<Option<WordRecord>> {
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM words WHERE lexicon_id = ?1 AND term = ?2", WORD_COLUMNS),
                params![lexicon_id, term],
                parse_word_row,
            )
            .optional()?)
    }

    /// Every term already stored in a lexicon
    pub fn lexicon_terms(conn: &Connection, lexicon_id: i64) -> Result<HashSet<String>> {
        let mut stmt = conn.prepare("SELECT term FROM words WHERE lexicon_id = ?1")?;
        let terms = stmt
            .query_map([lexicon_id], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(terms)
    }

    /// Words of a lexicon in id order
    pub fn lexicon_words(conn: &Connection, lexicon_id: i64) -> Result<Vec<WordRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM words WHERE lexicon_id = ?1 ORDER BY id",
            WORD_COLUMNS
        ))?;
        let words = stmt
            .query_map([lexicon_id], parse_word_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    /// Delete every word of a lexicon (entries cascade)
    pub fn delete_lexicon_words(conn: &Connection, lexicon_id: i64) -> Result<usize> {
        let deleted = conn.execute("DELETE FROM words WHERE lexicon_id = ?1", [lexicon_id])?;
        debug!("Deleted {} words from lexicon {}", deleted, lexicon_id);
        Ok(deleted)
    }

    /// Insert an entry with its gramcats, examples and conjugation
    pub fn insert_entry(conn: &Connection, word_id: i64, entry: &NewEntry) -> Result<i64> {
        let position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM entries WHERE word_id = ?1",
            [word_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO entries (word_id, variation_id, translation, position) VALUES (?1, ?2, ?3, ?4)",
            params![word_id, entry.variation_id, entry.translation, position],
        )?;
        let entry_id = conn.last_insert_rowid();

        let mut link = conn.prepare_cached(
            "INSERT OR IGNORE INTO entry_gramcats (entry_id, gramcat_id, position) VALUES (?1, ?2, ?3)",
        )?;
        for (i, gramcat_id) in entry.gramcat_ids.iter().enumerate() {
            link.execute(params![entry_id, gramcat_id, i as i64])?;
        }

        let mut example = conn
            .prepare_cached("INSERT INTO examples (entry_id, phrase) VALUES (?1, ?2)")?;
        for phrase in &entry.examples {
            example.execute(params![entry_id, phrase])?;
        }

        if let Some(conjugation) = &entry.conjugation {
            conn.execute(
                "INSERT INTO verbal_conjugations (entry_id, intro, raw, conjugation) VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry_id,
                    conjugation.intro,
                    conjugation.raw,
                    serde_json::to_string(&conjugation.conjugation)?,
                ],
            )?;
        }

        Ok(entry_id)
    }

    /// Gramcat ids of the common (variation-less) entries of a word, deduplicated in order
    pub fn common_gramcat_ids(conn: &Connection, word_id: i64) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare(
            "SELECT eg.gramcat_id FROM entry_gramcats eg
             JOIN entries e ON e.id = eg.entry_id
             WHERE e.word_id = ?1 AND e.variation_id IS NULL
             ORDER BY e.position, e.id, eg.position",
        )?;
        let ids = stmt
            .query_map([word_id], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    fn entry_gramcats(conn: &Connection, entry_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT g.abbreviation FROM entry_gramcats eg
             JOIN gramcats g ON g.id = eg.gramcat_id
             WHERE eg.entry_id = ?1 ORDER BY eg.position",
        )?;
        let gramcats = stmt
            .query_map([entry_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(gramcats)
    }

    fn entry_examples(conn: &Connection, entry_id: i64) -> Result<Vec<String>> {
        let mut stmt =
            conn.prepare_cached("SELECT phrase FROM examples WHERE entry_id = ?1 ORDER BY id")?;
        let examples = stmt
            .query_map([entry_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(examples)
    }

    fn entry_conjugation(conn: &Connection, entry_id: i64) -> Result<Option<ConjugationDetail>> {
        let row = conn
            .query_row(
                "SELECT intro, raw, conjugation FROM verbal_conjugations WHERE entry_id = ?1",
                [entry_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((intro, raw, json)) => Ok(Some(ConjugationDetail {
                intro,
                raw,
                conjugation: serde_json::from_str(&json).unwrap_or_default(),
            })),
            None => Ok(None),
        }
    }

    /// Expand a word with its lexicon code and entries
    pub fn word_detail(conn: &Connection, word: WordRecord) -> Result<WordDetail> {
        let lexicon = Self::get_lexicon(conn, word.lexicon_id)?
            .map(|l| l.code)
            .unwrap_or_default();

        let mut stmt = conn.prepare_cached(
            "SELECT e.id, e.translation, v.name FROM entries e
             LEFT JOIN diatopic_variations v ON v.id = e.variation_id
             WHERE e.word_id = ?1 ORDER BY e.position, e.id",
        )?;
        let rows = stmt
            .query_map([word.id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, translation, variation) in rows {
            entries.push(EntryDetail {
                id,
                translation,
                gramcats: Self::entry_gramcats(conn, id)?,
                variation,
                examples: Self::entry_examples(conn, id)?,
                conjugation: Self::entry_conjugation(conn, id)?,
            });
        }

        Ok(WordDetail {
            id: word.id,
            lexicon,
            term: word.term,
            slug: word.slug,
            etimol: word.etimol,
            entries,
        })
    }

    fn word_details(conn: &Connection, words: Vec<WordRecord>) -> Result<Vec<WordDetail>> {
        words
            .into_iter()
            .map(|word| Self::word_detail(conn, word))
            .collect()
    }

    fn list_words(conn: &Connection, limit: usize, offset: usize) -> Result<Page<WordRecord>> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM words ORDER BY term, id LIMIT ?1 OFFSET ?2",
            WORD_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![limit as i64, offset as i64], parse_word_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            count: count as usize,
            items,
        })
    }

    fn get_word(conn: &Connection, id: i64) -> Result<Option<WordRecord>> {
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
                [id],
                parse_word_row,
            )
            .optional()?)
    }

    /// Case-insensitive exact match, falling back to prefix match
    ///
    /// The page covers the exact matches when there are any.
    pub fn search_words(
        conn: &Connection,
        query: &str,
        lexicon_id: Option<i64>,
        limit: usize,
        offset: usize,
    ) -> Result<Page<WordRecord>> {
        let run = |condition: &str, pattern: &str| -> Result<Page<WordRecord>> {
            let filter = format!(
                "WHERE {} AND (?2 IS NULL OR lexicon_id = ?2)",
                condition
            );
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM words {}", filter),
                params![pattern, lexicon_id],
                |row| row.get(0),
            )?;

            let sql = format!(
                "SELECT {} FROM words {} ORDER BY term, id LIMIT ?3 OFFSET ?4",
                WORD_COLUMNS, filter
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(
                    params![pattern, lexicon_id, limit as i64, offset as i64],
                    parse_word_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Page {
                count: count as usize,
                items,
            })
        };

        let folded = query.to_lowercase();
        let exact = run("term_folded = ?1", &folded)?;
        if exact.count > 0 {
            return Ok(exact);
        }

        let escaped = folded
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        run(
            "term_folded LIKE ?1 ESCAPE '\\'",
            &format!("{}%", escaped),
        )
    }

    /// Words whose term is similar to the query, most similar first
    pub fn search_near(
        conn: &Connection,
        query: &str,
        threshold: f64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<NearWord>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Page::empty());
        }

        let mut stmt = conn.prepare(
            "SELECT w.id, w.term, w.term_folded, l.src_language, l.dst_language FROM words w
             JOIN lexicons l ON l.id = w.lexicon_id",
        )?;
        let candidates = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    LexiconCode::new(&row.get::<_, String>(3)?, &row.get::<_, String>(4)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut near: Vec<NearWord> = candidates
            .into_iter()
            .filter_map(|(id, term, folded, code)| {
                let similarity = strsim::sorensen_dice(&needle, &folded);
                (similarity >= threshold).then(|| NearWord {
                    id,
                    term,
                    lexicon: code.to_string(),
                    similarity,
                })
            })
            .collect();

        near.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.term.cmp(&b.term))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Page {
            count: near.len(),
            items: near.into_iter().skip(offset).take(limit).collect(),
        })
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Entries of a lexicon for CSV export: common entries when `variation_id` is None
    pub fn export_entries(
        conn: &Connection,
        lexicon_id: i64,
        variation_id: Option<i64>,
    ) -> Result<Vec<ExportEntryRow>> {
        let mut stmt = conn.prepare(
            "SELECT e.id, w.term, e.translation, vc.raw FROM entries e
             JOIN words w ON w.id = e.word_id
             LEFT JOIN verbal_conjugations vc ON vc.entry_id = e.id
             WHERE w.lexicon_id = ?1 AND e.variation_id IS ?2
             ORDER BY w.term, w.id, e.position, e.id",
        )?;
        let rows = stmt
            .query_map(params![lexicon_id, variation_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut export = Vec::with_capacity(rows.len());
        for (entry_id, term, translation, conjugation) in rows {
            export.push(ExportEntryRow {
                term,
                gramcats: Self::entry_gramcats(conn, entry_id)?,
                translation,
                examples: Self::entry_examples(conn, entry_id)?,
                conjugation,
            });
        }

        Ok(export)
    }

    // =========================================================================
    // Async read API
    // =========================================================================

    /// Page of lexicons ordered by name
    pub async fn lexicons_page(&self, limit: usize, offset: usize) -> Result<Page<LexiconRecord>> {
        self.db
            .execute_async(move |conn| Self::list_lexicons(conn, limit, offset))
            .await
    }

    /// Lexicon by id
    pub async fn lexicon(&self, id: i64) -> Result<Option<LexiconRecord>> {
        self.db
            .execute_async(move |conn| Self::get_lexicon(conn, id))
            .await
    }

    /// Page of words ordered by term
    pub async fn words_page(&self, limit: usize, offset: usize) -> Result<Page<WordDetail>> {
        self.db
            .execute_async(move |conn| {
                let page = Self::list_words(conn, limit, offset)?;
                Ok(Page {
                    count: page.count,
                    items: Self::word_details(conn, page.items)?,
                })
            })
            .await
    }

    /// Word by id
    pub async fn word(&self, id: i64) -> Result<Option<WordDetail>> {
        self.db
            .execute_async(move |conn| {
                Self::get_word(conn, id)?
                    .map(|word| Self::word_detail(conn, word))
                    .transpose()
            })
            .await
    }

    /// Search a term, optionally restricted to a lexicon code
    ///
    /// An unknown lexicon code yields an empty page.
    pub async fn search(
        &self,
        query: &str,
        lexicon: Option<LexiconCode>,
        limit: usize,
        offset: usize,
    ) -> Result<Page<WordDetail>> {
        let query = query.to_string();

        self.db
            .execute_async(move |conn| {
                let lexicon_id = match &lexicon {
                    Some(code) => match Self::find_lexicon_by_code(conn, code)? {
                        Some(lexicon) => Some(lexicon.id),
                        None => return Ok(Page::empty()),
                    },
                    None => None,
                };

                let page = Self::search_words(conn, &query, lexicon_id, limit, offset)?;
                Ok(Page {
                    count: page.count,
                    items: Self::word_details(conn, page.items)?,
                })
            })
            .await
    }

    /// Page of words similar to the query
    pub async fn near(
        &self,
        query: &str,
        threshold: f64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<NearWord>> {
        let query = query.to_string();
        self.db
            .execute_async(move |conn| Self::search_near(conn, &query, threshold, limit, offset))
            .await
    }

    /// Page of gramcats ordered by abbreviation
    pub async fn gramcats_page(&self, limit: usize, offset: usize) -> Result<Page<GramcatRecord>> {
        self.db
            .execute_async(move |conn| Self::list_gramcats(conn, limit, offset))
            .await
    }

    /// Gramcat by id
    pub async fn gramcat(&self, id: i64) -> Result<Option<GramcatRecord>> {
        self.db
            .execute_async(move |conn| Self::get_gramcat(conn, id))
            .await
    }

    /// Gramcat by abbreviation
    pub async fn gramcat_by_abbreviation(&self, abbreviation: &str) -> Result<Option<GramcatRecord>> {
        let abbreviation = abbreviation.to_string();
        self.db
            .execute_async(move |conn| Self::find_gramcat_by_abbreviation(conn, &abbreviation))
            .await
    }
}
