//! Keyword-dependent word tokenization.
//!
//! Hyphenated compounds are split apart unless the keyword being looked up
//! itself contains a hyphen, so the token list has to be rebuilt for every
//! keyword rather than cached per page.

use crate::lexicon::Keyword;

/// How hyphens in the text are treated while tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyphenMode {
    /// Hyphens separate tokens, like whitespace.
    Split,
    /// Hyphenated compounds stay a single token.
    Keep,
}

impl HyphenMode {
    pub fn for_keyword(keyword: &Keyword) -> Self {
        if keyword.has_hyphen() {
            HyphenMode::Keep
        } else {
            HyphenMode::Split
        }
    }
}

/// Split normalized text into tokens. Runs of separators never produce
/// empty tokens.
pub fn tokenize(text: &str, mode: HyphenMode) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || (mode == HyphenMode::Split && c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
