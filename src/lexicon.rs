//! Keyword lexicon: the ordered set of keywords searched for in a run.
//!
//! Insertion order is preserved end to end because report columns and
//! ranked distributions are keyed by lexicon position.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// A single lowercase, trimmed, non-empty keyword.
///
/// A keyword may contain internal spaces (a phrase) or hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Keyword(String);

impl Keyword {
    /// Lower-case and trim `raw` into a keyword.
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ScanError::Lexicon(
                "Keyword cannot be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the keyword contains a hyphen.
    pub fn has_hyphen(&self) -> bool {
        self.0.contains('-')
    }

    /// A phrase is a multi-word keyword without hyphens; only phrases are
    /// collapsed into a single token before context extraction.
    pub fn is_phrase(&self) -> bool {
        self.0.contains(' ') && !self.has_hyphen()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where the keywords of a run come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSource {
    /// A file with one keyword per line.
    File(PathBuf),
    /// A newline-delimited list entered by hand.
    Manual(String),
}

/// Ordered, duplicate-free collection of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lexicon {
    keywords: Vec<Keyword>,
}

impl Lexicon {
    /// Build a lexicon from newline-delimited text.
    ///
    /// Blank lines are skipped and duplicates keep their first position.
    /// Returns an error if no keyword remains.
    pub fn from_lines(text: &str) -> Result<Self> {
        let mut lexicon = Self::default();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            lexicon.push(Keyword::new(line)?);
        }

        if lexicon.is_empty() {
            return Err(ScanError::Lexicon(
                "Keyword source contains no keywords".to_string(),
            ));
        }
        Ok(lexicon)
    }

    /// Read a keyword file with one keyword per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::Lexicon(format!(
                "Failed to read keyword file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_lines(&content)
    }

    pub fn load(source: &KeywordSource) -> Result<Self> {
        match source {
            KeywordSource::File(path) => Self::from_file(path),
            KeywordSource::Manual(text) => Self::from_lines(text),
        }
    }

    /// Append a keyword unless it is already present. Returns whether it was added.
    pub fn push(&mut self, keyword: Keyword) -> bool {
        if self.keywords.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.keywords.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Keyword> {
        self.keywords.get(index)
    }

    /// Position of a keyword in lexicon order.
    pub fn position(&self, keyword: &str) -> Option<usize> {
        self.keywords.iter().position(|k| k.as_str() == keyword)
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}
