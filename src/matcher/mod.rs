//! Keyword matching over normalized page text.
//!
//! - **boundary**: whitespace-bounded literal occurrence counting
//! - **phrase**: collapsing of multi-word keywords into single tokens
//! - **context**: fixed-width snippets around a matched token
//!
//! Counting works on the untokenized text; snippets work on the token
//! sequence built for the specific keyword.

pub mod boundary;
pub mod context;
pub mod phrase;

pub use boundary::count_occurrences;
pub use context::{extract_context, half_width};
pub use phrase::{collapse, PhraseMatching};

use crate::lexicon::Keyword;
use crate::text::{tokenize, HyphenMode};

/// Tokenize `text` for `keyword` and collapse it when it is a phrase.
pub fn keyword_tokens(text: &str, keyword: &Keyword, matching: PhraseMatching) -> Vec<String> {
    let tokens = tokenize(text, HyphenMode::for_keyword(keyword));
    if keyword.is_phrase() {
        collapse(&tokens, keyword, matching)
    } else {
        tokens
    }
}

/// Snippet around the first token equal to `keyword`, or `None` when no
/// token aligns with it.
pub fn first_snippet(
    text: &str,
    keyword: &Keyword,
    context_length: usize,
    matching: PhraseMatching,
) -> Option<String> {
    let tokens = keyword_tokens(text, keyword, matching);
    tokens
        .iter()
        .position(|token| token == keyword.as_str())
        .map(|index| extract_context(&tokens, index, context_length))
}
