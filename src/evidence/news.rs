use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use super::{LookupError, NewsSource, RawArticle};
use crate::config::NewsConfig;
use crate::models::{Article, VERIFIED_SOURCE};

/// NewsAPI rejects `q` values longer than this.
const MAX_QUERY_CHARS: usize = 500;

/// Client for a NewsAPI-compatible `/v2/everything` endpoint.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, query: &str) -> RequestBuilder {
        let query = truncate_chars(query.trim(), MAX_QUERY_CHARS);
        self.client.get(&self.base_url).query(&[
            ("q", query),
            ("sortBy", "popularity"),
            ("language", "en"),
            ("apiKey", self.api_key.as_str()),
        ])
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, LookupError> {
        let response = self.request(query).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // NewsAPI explains failures in the body; prefer that over the bare status.
            return Err(match parse_articles(&body) {
                Err(LookupError::Api(message)) => LookupError::Api(message),
                _ => LookupError::Status(status),
            });
        }

        parse_articles(&body)
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<RawArticle>>,
}

/// Parse a NewsAPI response body into its article list.
pub fn parse_articles(body: &str) -> Result<Vec<RawArticle>, LookupError> {
    let response: NewsResponse = serde_json::from_str(body)?;

    if let Some(status) = response.status.as_deref() {
        if status != "ok" {
            return Err(LookupError::Api(
                response.message.unwrap_or_else(|| status.to_string()),
            ));
        }
    }

    response
        .articles
        .ok_or_else(|| LookupError::Parse("missing `articles` array".to_string()))
}

/// Keep articles from allow-listed outlets, up to `max` of them, in API order.
pub fn filter_trusted(articles: Vec<RawArticle>, trusted: &[String], max: usize) -> Vec<Article> {
    articles
        .into_iter()
        .filter_map(|raw| {
            let source = raw.source.name?;
            if !trusted.iter().any(|t| t == &source) {
                return None;
            }
            Some(Article {
                title: raw.title.filter(|t| !t.trim().is_empty())?,
                url: raw.url.filter(|u| !u.trim().is_empty())?,
                source,
                credibility: VERIFIED_SOURCE.to_string(),
            })
        })
        .take(max)
        .collect()
}

pub async fn lookup(
    source: &dyn NewsSource,
    config: &NewsConfig,
    text: &str,
) -> Result<Vec<Article>, LookupError> {
    if text.trim().is_empty() {
        return Err(LookupError::Empty);
    }

    let raw = source.search(text).await?;
    let total = raw.len();
    let articles = filter_trusted(raw, &config.trusted_sources, config.max_articles);
    debug!(total, trusted = articles.len(), "news search finished");

    if articles.is_empty() {
        return Err(LookupError::Empty);
    }
    Ok(articles)
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::tests::{DownNews, StaticNews};

    fn trusted() -> Vec<String> {
        vec!["Reuters".to_string(), "BBC News".to_string()]
    }

    const BODY: &str = r#"{
  "status": "ok",
  "totalResults": 5,
  "articles": [
    {"source": {"id": null, "name": "Daily Buzz"}, "title": "You won't believe this", "url": "https://buzz.example/1"},
    {"source": {"id": "reuters", "name": "Reuters"}, "title": "Senate passes budget", "url": "https://reuters.com/a"},
    {"source": {"id": "bbc-news", "name": "BBC News"}, "title": "Budget vote explained", "url": "https://bbc.co.uk/b"},
    {"source": {"id": "reuters", "name": "Reuters"}, "title": null, "url": "https://reuters.com/no-title"},
    {"source": {"id": "reuters", "name": "Reuters"}, "title": "Markets react", "url": "https://reuters.com/c"},
    {"source": {"id": "bbc-news", "name": "BBC News"}, "title": "What happens next", "url": "https://bbc.co.uk/d"}
  ]
}"#;

    #[test]
    fn test_parse_articles() {
        let articles = parse_articles(BODY).unwrap();
        assert_eq!(articles.len(), 6);
        assert_eq!(articles[1].source.name.as_deref(), Some("Reuters"));
        assert!(articles[3].title.is_none());
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        match parse_articles(body) {
            Err(LookupError::Api(msg)) => assert_eq!(msg, "Your API key is invalid."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_articles("<html>"), Err(LookupError::Parse(_))));
        assert!(matches!(
            parse_articles(r#"{"status": "ok"}"#),
            Err(LookupError::Parse(_))
        ));
    }

    #[test]
    fn test_filter_trusted_only_and_capped() {
        let articles = filter_trusted(parse_articles(BODY).unwrap(), &trusted(), 3);
        assert_eq!(articles.len(), 3);
        assert!(articles
            .iter()
            .all(|a| trusted().contains(&a.source) && a.credibility == VERIFIED_SOURCE));
        assert_eq!(articles[0].title, "Senate passes budget");
        // The untitled Reuters entry is skipped.
        assert_eq!(articles[2].title, "Markets react");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_lookup_untrusted_only_is_empty() {
        let source = StaticNews(vec![
            ("Shocking claim", "Daily Buzz"),
            ("Another one", "Viral Wire"),
        ]);
        let cfg = NewsConfig::default();
        let result = lookup(&source, &cfg, "some passage about events").await;
        assert!(matches!(result, Err(LookupError::Empty)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates_category() {
        let cfg = NewsConfig::default();
        let result = lookup(&DownNews, &cfg, "some passage").await;
        assert!(matches!(result, Err(LookupError::Status(_))));
    }

    #[tokio::test]
    async fn test_lookup_respects_max_articles() {
        let source = StaticNews(vec![
            ("One", "Reuters"),
            ("Two", "NPR"),
            ("Three", "BBC News"),
            ("Four", "CNN"),
        ]);
        let cfg = NewsConfig::default();
        let articles = lookup(&source, &cfg, "passage").await.unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[2].source, "BBC News");
    }

    fn query_pairs(url: &reqwest::Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_request_query() {
        let client = NewsApiClient::new(Client::new(), "https://newsapi.test/v2/everything", "k3y");
        let request = client.request("  Senate passes the budget  ").build().unwrap();

        assert_eq!(request.url().path(), "/v2/everything");
        assert_eq!(
            query_pairs(request.url()),
            vec![
                ("q".to_string(), "Senate passes the budget".to_string()),
                ("sortBy".to_string(), "popularity".to_string()),
                ("language".to_string(), "en".to_string()),
                ("apiKey".to_string(), "k3y".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_truncates_long_query() {
        let client = NewsApiClient::new(Client::new(), "https://newsapi.test/v2/everything", "k3y");
        let text = "é".repeat(MAX_QUERY_CHARS + 40);
        let request = client.request(&text).build().unwrap();

        let q = query_pairs(request.url())
            .into_iter()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v)
            .unwrap();
        assert_eq!(q.chars().count(), MAX_QUERY_CHARS);
    }
}
