//! Source formatting for answers

/// Keep the first `max_chars` characters of `text`, appending `...` when cut
pub fn truncate_source_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
