//! Whitespace-bounded literal keyword counting.
//!
//! An occurrence only counts when a whitespace character sits immediately
//! before and immediately after the keyword. A keyword glued to the very
//! start or end of the page text therefore never counts. Matches do not
//! overlap: the trailing whitespace of one match is consumed and cannot be
//! the leading boundary of the next, so `" cat cat "` holds one match.

use crate::error::{Result, ScanError};

/// Count whitespace-bounded occurrences of `keyword` in `text`.
///
/// The keyword is matched literally. Returns `ScanError::Pattern` when the
/// keyword is empty or starts/ends with whitespace, since such a keyword
/// cannot be expressed as a bounded literal.
pub fn count_occurrences(text: &str, keyword: &str) -> Result<usize> {
    validate_pattern(keyword)?;

    let mut count = 0;
    // Leftmost position the next match (including its leading whitespace) may start at.
    let mut floor = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(keyword) {
        let start = cursor + offset;
        let end = start + keyword.len();

        let before = text[floor..start].chars().next_back();
        let after = text[end..].chars().next();

        match (before, after) {
            (Some(b), Some(a)) if b.is_whitespace() && a.is_whitespace() => {
                count += 1;
                floor = end + a.len_utf8();
                cursor = floor;
            }
            _ => {
                // Step one char past this candidate; keyword is non-empty.
                let step = text[start..].chars().next().map_or(1, char::len_utf8);
                cursor = start + step;
            }
        }

        if cursor >= text.len() {
            break;
        }
    }

    Ok(count)
}

fn validate_pattern(keyword: &str) -> Result<()> {
    if keyword.is_empty() {
        return Err(ScanError::Pattern(
            "Keyword is empty and cannot be matched".to_string(),
        ));
    }
    let edge_whitespace = keyword.starts_with(char::is_whitespace)
        || keyword.ends_with(char::is_whitespace);
    if edge_whitespace {
        return Err(ScanError::Pattern(format!(
            "Keyword '{}' starts or ends with whitespace",
            keyword
        )));
    }
    Ok(())
}
