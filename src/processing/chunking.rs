//! Positional chunking of extracted document text.
//!
//! Partitioning is purely positional: the text is sliced into consecutive
//! non-overlapping character windows of `max_tokens * 4` characters (1 token
//! ≈ 4 characters), with no attempt to respect sentence or paragraph
//! boundaries. Concatenating the chunks in order reconstructs the input
//! exactly.

/// Character-per-token approximation used to size chunks.
const CHARS_PER_TOKEN: usize = 4;

/// Split `text` into ordered character windows of at most `max_tokens * 4`
/// characters; the last window may be shorter.
///
/// Windows count Unicode scalar values, not bytes, so multi-byte characters
/// never split a chunk mid-character. Empty input yields a single empty
/// chunk, so the pipeline always has at least one chunk to summarize.
pub(crate) fn chunk_text(text: &str, max_tokens: usize) -> Vec<String> {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN).max(1);
    if text.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|window| window.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_reconstructs_input() {
        let text = "abcdefghij".repeat(137);
        let chunks = chunk_text(&text, 7);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let text = "a".repeat(6000);
        let chunks = chunk_text(&text, 1500);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn chunk_count_is_ceiling_of_length_over_window() {
        let text = "x".repeat(12_001);
        let chunks = chunk_text(&text, 1500);
        // 12001 chars at 6000 chars per window.
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 6000);
        assert_eq!(chunks[1].chars().count(), 6000);
        assert_eq!(chunks[2].chars().count(), 1);
    }

    #[test]
    fn empty_input_yields_one_empty_chunk() {
        assert_eq!(chunk_text("", 1500), vec![String::new()]);
    }

    #[test]
    fn windows_count_characters_not_bytes() {
        let text = "é".repeat(10);
        let chunks = chunk_text(&text, 1);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "é".repeat(4));
        assert_eq!(chunks[2], "é".repeat(2));
        assert_eq!(chunks.concat(), text);
    }
}
