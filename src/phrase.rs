// src/phrase.rs
//! Phrase matching: case-insensitive, punctuation-insensitive (text side),
//! word-order-preserving contiguous match.

/// Lowercase, replace each ASCII punctuation char with a space, split on whitespace.
fn text_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    cleaned.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Phrase side is only lowercased; punctuation in a phrase is matched literally.
fn phrase_words(phrase: &str) -> Vec<String> {
    phrase
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// True iff the words of `phrase` occur as a contiguous run in `text`.
/// An empty (or whitespace-only) phrase matches any text.
pub fn contains(phrase: &str, text: &str) -> bool {
    let needle = phrase_words(phrase);
    if needle.is_empty() {
        return true;
    }
    let hay = text_words(text);
    hay.windows(needle.len()).any(|w| w == needle.as_slice())
}
