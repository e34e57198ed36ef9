use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::LexiconError;

/// Lexicon code utilities
///
/// A lexicon is addressed by `<src>-<dst>`, both sides being 2 or 3 letter
/// ISO 639 language codes (e.g. `es-ar`).
static LEXICON_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z]{2,3})-([a-zA-Z]{2,3})$").expect("valid lexicon code regex"));

/// Parsed lexicon code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LexiconCode {
    /// Source language code
    pub src_language: String,
    /// Destination language code
    pub dst_language: String,
}

impl LexiconCode {
    pub fn new(src_language: &str, dst_language: &str) -> Self {
        Self {
            src_language: src_language.to_string(),
            dst_language: dst_language.to_string(),
        }
    }
}

impl FromStr for LexiconCode {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LEXICON_CODE_RE
            .captures(s.trim())
            .ok_or_else(|| LexiconError::InvalidCode(s.to_string()))?;

        Ok(Self::new(&caps[1], &caps[2]))
    }
}

impl fmt::Display for LexiconCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.src_language, self.dst_language)
    }
}
