//! Length and whitespace policy for output fields.

/// Collapse every whitespace run to a single space and trim both ends.
///
/// ```
/// assert_eq!(pagemeta_web::text::normalize_whitespace("a\n\n  b"), "a b");
/// ```
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max` characters. Hard cut, no word boundary search.
pub fn clip_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

/// Policy for fixed-width display fields: normalize, then clip.
pub fn display_field(raw: &str, max: usize) -> String {
    clip_chars(&normalize_whitespace(raw), max)
}
