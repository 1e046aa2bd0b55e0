//! Text handling shared by the prediction pipeline and the evidence lookups.
//!
//! - [`normalize`]: canonical lowercase form fed to the vectorizer.
//! - [`keywords`]: capitalized-word extraction used to build search queries.

pub mod keywords;
pub mod normalize;

/// Characters matched by `\w`: letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
