//! Excerpt Utilities
//!
//! Shortens statement text for explanations while respecting UTF-8
//! boundaries.

/// Collapse whitespace and cut `text` to at most `max_chars` characters,
/// appending `...` when anything was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let keep = max_chars.saturating_sub(3);
    let end = flat
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(flat.len());
    format!("{}...", flat[..end].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("I paid the rent", 40), "I paid the rent");
    }

    #[test]
    fn test_excerpt_collapses_whitespace() {
        assert_eq!(excerpt("I  paid\nthe   rent", 40), "I paid the rent");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "Ünïcödé façade naïveté résumé";
        let cut = excerpt(text, 10);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= 10);
    }
}
