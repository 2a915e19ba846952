//! Context snippets around a matched token.

/// Half-width of the context window: `context_length / 2` rounded half to
/// even, so 3 gives 2, 5 gives 2 and 7 gives 4.
pub fn half_width(context_length: usize) -> usize {
    let half = context_length / 2;
    if context_length % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

/// Build the context snippet for the token at `match_index`.
///
/// The window is `half` tokens before the match followed by `half` tokens
/// starting at the match, where `half` comes from [`half_width`]. Bounds are
/// clamped to the sequence, so the window never exceeds `2 * half` tokens.
/// A single `" "` token in the window is dropped (at most one).
pub fn extract_context(tokens: &[String], match_index: usize, context_length: usize) -> String {
    let half = half_width(context_length);
    let len = tokens.len();
    let index = match_index.min(len);

    let start = index.saturating_sub(half);
    let end = index.saturating_add(half).min(len);
    let mut window: Vec<&str> = tokens[start..end].iter().map(String::as_str).collect();

    if let Some(blank) = window.iter().position(|token| *token == " ") {
        window.remove(blank);
    }

    window.join(" ")
}
