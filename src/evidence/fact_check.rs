use reqwest::Url;

use super::LookupError;
use crate::config::SearchConfig;
use crate::models::FactCheckQuery;
use crate::text::keywords;

/// Build a search-engine link for `"<keywords> fact check"`.
///
/// Keywords are the leading capitalized words of `text`, or its first few raw
/// words when it has none.
pub fn build_query(config: &SearchConfig, text: &str) -> Result<FactCheckQuery, LookupError> {
    let words = keywords::extract(text, config.max_keywords, config.fallback_words);
    if words.is_empty() {
        return Err(LookupError::Empty);
    }
    let keywords = words.join(" ");

    let query = format!("{} fact check", keywords);
    let url = Url::parse_with_params(&config.base_url, &[("q", query.as_str())])
        .map_err(|e| LookupError::Encoding(format!("{}: {}", config.base_url, e)))?;

    Ok(FactCheckQuery {
        keywords,
        link: url.to_string(),
    })
}
