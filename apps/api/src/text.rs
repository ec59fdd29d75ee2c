/// Truncates `s` to at most `max` characters, never splitting a character.
///
/// Bounds are in characters, not bytes, so multi-byte text truncates cleanly.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
