//! Phrase collapsing.
//!
//! Rewrites a token sequence so each occurrence of a multi-word keyword
//! becomes one token equal to the keyword. The consumed trailing tokens are
//! removed, so positions after a collapsed phrase shift left. Occurrences
//! that span a page boundary are never seen because pages are tokenized
//! independently.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::lexicon::Keyword;

/// How a candidate position is decided to hold the phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseMatching {
    /// Every phrase token must equal the text token at its offset.
    #[default]
    Strict,
    /// Only the final phrase token is compared. Reproduces the legacy tool,
    /// which kept the outcome of the last comparison of its inner loop.
    LastToken,
}

impl PhraseMatching {
    fn matches_at(self, tokens: &[String], parts: &[&str], at: usize) -> bool {
        match self {
            PhraseMatching::Strict => parts
                .iter()
                .enumerate()
                .all(|(m, part)| tokens[at + m] == *part),
            PhraseMatching::LastToken => {
                let last = parts.len() - 1;
                tokens[at + last] == parts[last]
            }
        }
    }
}

/// Collapse every occurrence of `phrase` in `tokens` into a single token.
///
/// Scans every start position `l` in `0..=len(tokens) - len(phrase tokens)`.
/// On a match `tokens[l]` becomes the phrase and `l+1 .. l+k-1` are flagged;
/// flagged indices are removed after the scan, highest first.
pub fn collapse(tokens: &[String], phrase: &Keyword, matching: PhraseMatching) -> Vec<String> {
    let parts: Vec<&str> = phrase.as_str().split_whitespace().collect();
    let mut out = tokens.to_vec();
    if parts.is_empty() || parts.len() > out.len() {
        return out;
    }

    let mut flagged = BTreeSet::new();
    for l in 0..=out.len() - parts.len() {
        if matching.matches_at(&out, &parts, l) {
            out[l] = phrase.as_str().to_string();
            flagged.extend(l + 1..l + parts.len());
        }
    }

    for index in flagged.into_iter().rev() {
        out.remove(index);
    }
    out
}
