use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use super::{Encyclopedia, LookupError};
use crate::config::EncyclopediaConfig;
use crate::models::EncyclopediaContext;
use crate::text::keywords;

/// Client for the MediaWiki action API (`/w/api.php`).
pub struct MediaWikiClient {
    client: Client,
    base_url: String,
}

impl MediaWikiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn request(&self, params: &[(&str, &str)]) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
    }

    fn search_request(&self, query: &str, limit: usize) -> RequestBuilder {
        let limit = limit.to_string();
        self.request(&[
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", limit.as_str()),
            ("srprop", ""),
        ])
    }

    fn summary_request(&self, title: &str, sentences: usize) -> RequestBuilder {
        let sentences = sentences.to_string();
        self.request(&[
            ("prop", "extracts|pageprops"),
            ("ppprop", "disambiguation"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("exsentences", sentences.as_str()),
            ("redirects", "1"),
            ("titles", title),
        ])
    }
}

async fn send(request: RequestBuilder) -> Result<String, LookupError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }
    Ok(response.text().await?)
}

#[async_trait]
impl Encyclopedia for MediaWikiClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, LookupError> {
        let body = send(self.search_request(query, limit)).await?;
        parse_search(&body)
    }

    async fn summary(&self, title: &str, sentences: usize) -> Result<String, LookupError> {
        let body = send(self.summary_request(title, sentences)).await?;
        parse_summary(&body, title)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<serde_json::Map<String, serde_json::Value>>,
}

fn api_error(err: ApiError) -> LookupError {
    LookupError::Api(format!("{}: {}", err.code, err.info))
}

/// Titles from a `list=search` response, best match first.
pub fn parse_search(body: &str) -> Result<Vec<String>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    if let Some(err) = response.error {
        return Err(api_error(err));
    }
    let query = response
        .query
        .ok_or_else(|| LookupError::Parse("missing `query` object".to_string()))?;
    Ok(query.search.into_iter().map(|hit| hit.title).collect())
}

/// Intro extract from a `prop=extracts|pageprops` response.
pub fn parse_summary(body: &str, requested: &str) -> Result<String, LookupError> {
    let response: PageResponse = serde_json::from_str(body)?;
    if let Some(err) = response.error {
        return Err(api_error(err));
    }
    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| LookupError::MissingPage(requested.to_string()))?;

    if page.missing || page.invalid {
        return Err(LookupError::MissingPage(requested.to_string()));
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.contains_key("disambiguation"))
    {
        return Err(LookupError::Disambiguation(page.title));
    }

    match page.extract.map(|e| e.trim().to_string()) {
        Some(extract) if !extract.is_empty() => Ok(extract),
        _ => Err(LookupError::Empty),
    }
}

pub async fn lookup(
    source: &dyn Encyclopedia,
    config: &EncyclopediaConfig,
    text: &str,
) -> Result<EncyclopediaContext, LookupError> {
    let words = keywords::extract(text, config.max_keywords, 1);
    if words.is_empty() {
        return Err(LookupError::Empty);
    }
    let query = words.join(" ");

    let mut titles = source.search(&query, config.max_suggestions.max(1)).await?;
    debug!(%query, hits = titles.len(), "encyclopedia search finished");

    let top = titles.first().cloned().ok_or(LookupError::Empty)?;
    let summary = source.summary(&top, config.summary_sentences).await?;

    titles.truncate(config.max_suggestions);
    Ok(EncyclopediaContext {
        summary,
        suggestions: titles,
    })
}
