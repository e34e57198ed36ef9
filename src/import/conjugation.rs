use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::database::models::ConjugationDetail;

/// Tense labels a complete verbal conjugation carries
pub const REQUIRED_TENSES: &[&str] = &[
    "infinitivo",
    "gerundio",
    "participio",
    "indicativo",
    "subjuntivo",
    "imperativo",
];

static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([\p{L} ]+?)\s*:\s*(.*)$").expect("valid conjugation regex"));

/// Parse a conjugation cell
///
/// Sections are `label: forms`, separated by `;` or newlines. Text before the
/// first labelled section is the intro.
pub fn parse_conjugation(raw: &str) -> ConjugationDetail {
    let mut intro = Vec::new();
    let mut conjugation = BTreeMap::new();

    for section in raw.split(['\n', ';']).map(str::trim).filter(|s| !s.is_empty()) {
        match SECTION_RE.captures(section) {
            Some(caps) => {
                conjugation.insert(caps[1].to_lowercase(), caps[2].trim().to_string());
            }
            None if conjugation.is_empty() => intro.push(section.to_string()),
            None => {}
        }
    }

    ConjugationDetail {
        intro: intro.join(" "),
        raw: raw.trim().to_string(),
        conjugation,
    }
}

/// Required tenses absent from a parsed conjugation
pub fn missing_tenses(conjugation: &ConjugationDetail) -> Vec<&'static str> {
    REQUIRED_TENSES
        .iter()
        .copied()
        .filter(|tense| {
            conjugation
                .conjugation
                .get(*tense)
                .is_none_or(|forms| forms.is_empty())
        })
        .collect()
}

/// Whether a gramcat abbreviation denotes a verb
pub fn is_verb_gramcat(abbreviation: &str) -> bool {
    abbreviation.trim_start().starts_with("v.")
}
