//! Character filtering and case folding of raw page text.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// The character-filtering policy applied to every page of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Delete everything that is not an ASCII letter, ASCII digit or a space.
    StripNonAlphanumeric,
    /// Delete every character in the set.
    CustomCharacterSet(BTreeSet<char>),
}

/// Where the active filter policy comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSource {
    /// Strip non-alphanumeric characters.
    Basic,
    /// A file whose characters (newlines excluded) are deleted.
    File(PathBuf),
    /// Characters entered by hand (newlines excluded).
    Manual(String),
}

impl FilterPolicy {
    /// Build a custom policy from a character definition. Newlines are not
    /// part of the set.
    pub fn from_characters(definition: &str) -> Self {
        let set = definition.chars().filter(|&c| c != '\n').collect();
        FilterPolicy::CustomCharacterSet(set)
    }

    /// Read a filter file whose characters form the delete-set.
    pub fn from_file(path: &Path) -> Result<Self> {
        let definition = std::fs::read_to_string(path).map_err(|e| {
            ScanError::InputAccess(format!(
                "Failed to read filter file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_characters(&definition))
    }

    pub fn load(source: &FilterSource) -> Result<Self> {
        match source {
            FilterSource::Basic => Ok(FilterPolicy::StripNonAlphanumeric),
            FilterSource::File(path) => Self::from_file(path),
            FilterSource::Manual(definition) => Ok(Self::from_characters(definition)),
        }
    }
}

/// Apply `policy` to `raw` and lower-case the result.
///
/// For custom sets a character is also dropped when its lowercase form is
/// in the set, so the output never contains a deletable character and
/// `normalize(normalize(t)) == normalize(t)`. This departs from the legacy
/// filter-then-lowercase order, under which set `{a}` turns `"Alpha"` into
/// `"alph"` rather than `"lph"`.
pub fn normalize(raw: &str, policy: &FilterPolicy) -> String {
    let mut out = String::with_capacity(raw.len());
    match policy {
        FilterPolicy::StripNonAlphanumeric => {
            for c in raw.chars() {
                if c.is_ascii_alphanumeric() || c == ' ' {
                    out.push(c.to_ascii_lowercase());
                }
            }
        }
        FilterPolicy::CustomCharacterSet(set) => {
            for c in raw.chars() {
                if set.contains(&c) {
                    continue;
                }
                for lower in c.to_lowercase() {
                    if !set.contains(&lower) {
                        out.push(lower);
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strip_keeps_letters_digits_spaces() {
        let text = normalize(
            "The cat sat. Climate change is real. A cat ran.",
            &FilterPolicy::StripNonAlphanumeric,
        );
        assert_eq!(text, "the cat sat climate change is real a cat ran");
    }

    #[test]
    fn test_strip_removes_tabs_newlines_and_unicode() {
        let text = normalize("CO₂\tlevels\nrise é", &FilterPolicy::StripNonAlphanumeric);
        assert_eq!(text, "colevelsrise ");
    }

    #[test]
    fn test_custom_set_deletes_listed_characters() {
        let policy = FilterPolicy::from_characters(".,\n;");
        let text = normalize("Hello, World; bye.\nNext", &policy);
        assert_eq!(text, "hello world bye\nnext");
    }

    #[test]
    fn test_custom_set_excludes_newline_from_definition() {
        match FilterPolicy::from_characters("a\nb\n") {
            FilterPolicy::CustomCharacterSet(set) => {
                assert_eq!(set.into_iter().collect::<String>(), "ab");
            }
            other => panic!("unexpected policy: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", &FilterPolicy::StripNonAlphanumeric), "");
        assert_eq!(normalize("", &FilterPolicy::from_characters("x")), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let policies = [
            FilterPolicy::StripNonAlphanumeric,
            FilterPolicy::from_characters("a.-"),
            FilterPolicy::from_characters(""),
        ];
        let samples = [
            "Alpha-Beta. GAMMA delta",
            "  Mixed\tCASE text!! ",
            "Ünïcödé İstanbul ß",
            "",
        ];
        for policy in &policies {
            for sample in samples {
                let once = normalize(sample, policy);
                assert_eq!(normalize(&once, policy), once, "policy {:?}", policy);
            }
        }
    }

    #[test]
    fn test_case_folded_deletion_differs_from_filter_then_lowercase() {
        let policy = FilterPolicy::from_characters("a");
        let legacy: String = "Alpha"
            .chars()
            .filter(|c| *c != 'a')
            .collect::<String>()
            .to_lowercase();
        assert_eq!(legacy, "alph");
        assert_eq!(normalize("Alpha", &policy), "lph");
    }

    #[test]
    fn test_uppercase_of_deleted_char_is_deleted() {
        let policy = FilterPolicy::from_characters("a");
        assert_eq!(normalize("AbA", &policy), "b");
    }

    #[test]
    fn test_load_sources() {
        assert_eq!(
            FilterPolicy::load(&FilterSource::Basic).unwrap(),
            FilterPolicy::StripNonAlphanumeric
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ".,\n!").unwrap();
        let policy = FilterPolicy::load(&FilterSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(policy, FilterPolicy::from_characters(".,!"));

        let missing = FilterSource::File(PathBuf::from("/nonexistent/lexiscan_filters.txt"));
        assert!(matches!(
            FilterPolicy::load(&missing),
            Err(ScanError::InputAccess(_))
        ));
    }
}
