//! Best-effort corroboration of a passage against outside sources.
//!
//! - [`fact_check`]: builds a web-search link for "<keywords> fact check" (no network).
//! - [`news`]: news-search API filtered to a trusted-source allow-list.
//! - [`encyclopedia`]: MediaWiki search plus a short intro extract.
//!
//! Every lookup returns `Result<_, LookupError>` internally; the aggregator logs
//! the failure category and hands the caller `None`. Nothing here can fail an
//! analysis.

pub mod encyclopedia;
pub mod fact_check;
pub mod news;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, EncyclopediaConfig, NewsConfig, SearchConfig};
use crate::models::{Article, EncyclopediaContext, EvidenceBundle, FactCheckQuery};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("service error: {0}")]
    Api(String),
    #[error("no results")]
    Empty,
    #[error("{0:?} is a disambiguation page")]
    Disambiguation(String),
    #[error("page {0:?} does not exist")]
    MissingPage(String),
    #[error("could not build URL: {0}")]
    Encoding(String),
}

impl LookupError {
    /// Expected outcomes that are not worth a warning.
    fn is_quiet(&self) -> bool {
        matches!(self, LookupError::NotConfigured(_) | LookupError::Empty)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Parse(err.to_string())
    }
}

/// An article as returned by the news-search API, before filtering.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: RawSource,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, LookupError>;
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Page titles matching `query`, best match first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, LookupError>;

    /// Plain-text intro of `title`, cut to `sentences` sentences.
    async fn summary(&self, title: &str, sentences: usize) -> Result<String, LookupError>;
}

/// Runs the three lookups for a passage and collects whatever succeeded.
pub struct EvidenceAggregator {
    search: SearchConfig,
    news: Option<Arc<dyn NewsSource>>,
    news_config: NewsConfig,
    encyclopedia: Option<Arc<dyn Encyclopedia>>,
    encyclopedia_config: EncyclopediaConfig,
}

impl EvidenceAggregator {
    /// Aggregator with only the offline fact-check link enabled.
    pub fn new(config: &Config) -> Self {
        Self {
            search: config.search.clone(),
            news: None,
            news_config: config.news.clone(),
            encyclopedia: None,
            encyclopedia_config: config.encyclopedia.clone(),
        }
    }

    pub fn with_news(mut self, source: Arc<dyn NewsSource>) -> Self {
        self.news = Some(source);
        self
    }

    pub fn with_encyclopedia(mut self, source: Arc<dyn Encyclopedia>) -> Self {
        self.encyclopedia = Some(source);
        self
    }

    /// Wire up the HTTP-backed sources. The news source is only attached when
    /// an API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()?;

        let mut aggregator = Self::new(config).with_encyclopedia(Arc::new(
            encyclopedia::MediaWikiClient::new(client.clone(), &config.encyclopedia.base_url),
        ));

        match &config.news.api_key {
            Some(key) => {
                aggregator = aggregator.with_news(Arc::new(news::NewsApiClient::new(
                    client,
                    &config.news.base_url,
                    key,
                )));
            }
            None => debug!("no news API key configured; news lookup disabled"),
        }

        Ok(aggregator)
    }

    pub fn build_fact_check_query(&self, text: &str) -> Option<FactCheckQuery> {
        contained("fact-check", fact_check::build_query(&self.search, text))
    }

    pub async fn fetch_news_sources(&self, text: &str) -> Option<Vec<Article>> {
        let result = match &self.news {
            Some(source) => news::lookup(source.as_ref(), &self.news_config, text).await,
            None => Err(LookupError::NotConfigured("news API key")),
        };
        contained("news", result)
    }

    pub async fn check_encyclopedia(&self, text: &str) -> Option<EncyclopediaContext> {
        let result = match &self.encyclopedia {
            Some(source) => {
                encyclopedia::lookup(source.as_ref(), &self.encyclopedia_config, text).await
            }
            None => Err(LookupError::NotConfigured("encyclopedia")),
        };
        contained("encyclopedia", result)
    }

    /// All three lookups; the network-bound ones run concurrently.
    pub async fn gather(&self, text: &str) -> EvidenceBundle {
        let fact_check = self.build_fact_check_query(text);
        let (articles, encyclopedia) = futures::join!(
            self.fetch_news_sources(text),
            self.check_encyclopedia(text)
        );

        EvidenceBundle {
            fact_check,
            articles,
            encyclopedia,
        }
    }
}

/// Log a failed lookup by category and turn it into absence.
fn contained<T>(lookup: &'static str, result: Result<T, LookupError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_quiet() => {
            debug!(lookup, reason = %err, "no evidence");
            None
        }
        Err(err) => {
            warn!(lookup, error = %err, "evidence lookup failed");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use reqwest::StatusCode;

    pub(crate) struct DownNews;

    #[async_trait]
    impl NewsSource for DownNews {
        async fn search(&self, _query: &str) -> Result<Vec<RawArticle>, LookupError> {
            Err(LookupError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    pub(crate) struct DownEncyclopedia;

    #[async_trait]
    impl Encyclopedia for DownEncyclopedia {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>, LookupError> {
            Err(LookupError::Api("maxlag".to_string()))
        }

        async fn summary(&self, _title: &str, _sentences: usize) -> Result<String, LookupError> {
            Err(LookupError::Api("maxlag".to_string()))
        }
    }

    pub(crate) struct StaticNews(pub Vec<(&'static str, &'static str)>);

    #[async_trait]
    impl NewsSource for StaticNews {
        async fn search(&self, _query: &str) -> Result<Vec<RawArticle>, LookupError> {
            Ok(self
                .0
                .iter()
                .map(|(title, source)| RawArticle {
                    title: Some(title.to_string()),
                    source: RawSource {
                        name: Some(source.to_string()),
                    },
                    url: Some(format!("https://example.com/{}", title.replace(' ', "-"))),
                })
                .collect())
        }
    }

    pub(crate) struct StaticEncyclopedia;

    #[async_trait]
    impl Encyclopedia for StaticEncyclopedia {
        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>, LookupError> {
            Ok(["Mars", "Water on Mars", "Mars Express", "Mars rover"]
                .iter()
                .take(limit)
                .map(|s| s.to_string())
                .collect())
        }

        async fn summary(&self, title: &str, _sentences: usize) -> Result<String, LookupError> {
            Ok(format!("{} is the fourth planet from the Sun.", title))
        }
    }

    const PASSAGE: &str = "NASA scientists say Mars once held liquid Water near its equator";

    #[tokio::test]
    async fn test_failing_sources_yield_absence() {
        let aggregator = EvidenceAggregator::new(&Config::default())
            .with_news(Arc::new(DownNews))
            .with_encyclopedia(Arc::new(DownEncyclopedia));

        let bundle = aggregator.gather(PASSAGE).await;
        assert!(bundle.articles.is_none());
        assert!(bundle.encyclopedia.is_none());
        // The fact-check link needs no network and still comes through.
        assert!(bundle.fact_check.is_some());
    }

    #[tokio::test]
    async fn test_unconfigured_sources_yield_absence() {
        let aggregator = EvidenceAggregator::new(&Config::default());
        let bundle = aggregator.gather(PASSAGE).await;
        assert!(bundle.articles.is_none());
        assert!(bundle.encyclopedia.is_none());
    }

    #[tokio::test]
    async fn test_gather_collects_each_source() {
        let aggregator = EvidenceAggregator::new(&Config::default())
            .with_news(Arc::new(StaticNews(vec![
                ("Mars water confirmed", "Reuters"),
                ("Aliens on Mars", "Totally Real News"),
            ])))
            .with_encyclopedia(Arc::new(StaticEncyclopedia));

        let bundle = aggregator.gather(PASSAGE).await;

        let articles = bundle.articles.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "Reuters");

        let context = bundle.encyclopedia.unwrap();
        assert_eq!(context.suggestions, vec!["Mars", "Water on Mars", "Mars Express"]);
        assert!(context.summary.starts_with("Mars is"));

        assert_eq!(bundle.fact_check.unwrap().keywords, "Mars Water");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let aggregator = EvidenceAggregator::new(&Config::default())
            .with_news(Arc::new(DownNews))
            .with_encyclopedia(Arc::new(StaticEncyclopedia));

        let bundle = aggregator.gather(PASSAGE).await;
        assert!(bundle.articles.is_none());
        assert!(bundle.encyclopedia.is_some());
    }
}
