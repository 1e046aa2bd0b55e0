use super::is_word_char;

/// Words made of one ASCII capital followed by lowercase letters (`\b[A-Z][a-z]+\b`),
/// in order of appearance.
pub fn capitalized_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|word| is_capitalized(word))
        .collect()
}

fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let rest = chars.as_str();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase())
        }
        _ => false,
    }
}

/// First `n` whitespace-delimited words of the raw text.
pub fn first_words(text: &str, n: usize) -> Vec<&str> {
    text.split_whitespace().take(n).collect()
}

/// Up to `limit` capitalized words, or the first `fallback` raw words when
/// the text has none. Returns an empty list only for blank input.
pub fn extract(text: &str, limit: usize, fallback: usize) -> Vec<&str> {
    let mut words = capitalized_words(text);
    if words.is_empty() {
        return first_words(text, fallback);
    }
    words.truncate(limit);
    words
}
