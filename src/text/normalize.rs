use super::is_word_char;

/// Lowercase `raw`, turn every non-word character into a space, and collapse
/// whitespace runs to a single space. Leading and trailing spaces are dropped.
pub fn normalize(raw: &str) -> String {
    let replaced: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-delimited tokens in the raw text.
pub fn token_count(raw: &str) -> usize {
    raw.split_whitespace().count()
}
