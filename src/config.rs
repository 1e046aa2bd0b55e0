use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::predict::DEFAULT_MIN_TOKENS;

/// Environment variable that overrides `news.api_key`.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";

/// Root configuration structure, deserialized from `.news-checkr/config.toml`.
///
/// Every section and field is optional; missing values take the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub http: HttpConfig,
    pub search: SearchConfig,
    pub news: NewsConfig,
    pub encyclopedia: EncyclopediaConfig,
}

/// Locations of the fitted artifacts and the input guard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
    /// Passages with fewer whitespace-delimited words are rejected.
    pub min_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer: PathBuf::from("models/vectorizer.json"),
            classifier: PathBuf::from("models/classifier.json"),
            min_tokens: DEFAULT_MIN_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("news-checkr/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fact-check search link construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    /// Capitalized words kept in the query.
    pub max_keywords: usize,
    /// Raw words used when the text has no capitalized words.
    pub fallback_words: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
            max_keywords: 5,
            fallback_words: 7,
        }
    }
}

/// News-search API and the trusted-source allow-list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Outlet names (exact `source.name` values) tagged as verified.
    pub trusted_sources: Vec<String>,
    pub max_articles: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        let trusted_sources = [
            "Reuters",
            "Associated Press",
            "BBC News",
            "CNN",
            "NPR",
            "The New York Times",
            "The Washington Post",
            "The Wall Street Journal",
            "Bloomberg",
            "The Guardian",
            "Al Jazeera English",
            "ABC News",
            "CBS News",
            "NBC News",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            base_url: "https://newsapi.org/v2/everything".to_string(),
            api_key: None,
            trusted_sources,
            max_articles: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    pub base_url: String,
    pub max_keywords: usize,
    pub max_suggestions: usize,
    pub summary_sentences: usize,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            max_keywords: 3,
            max_suggestions: 3,
            summary_sentences: 2,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `./.news-checkr/config.toml`
/// 3. `~/.config/news-checkr/config.toml`
/// 4. Built-in [`Config::default`]
///
/// Relative artifact paths set in a config file resolve against that file's
/// directory; the built-in defaults resolve against the working directory.
/// `NEWS_API_KEY`, when set and non-empty, replaces `news.api_key`.
pub fn load_config(workdir: &Path, config_override: Option<&Path>) -> Result<Config> {
    let mut config = match find_config_file(workdir, config_override) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse_config(&content, &path)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(key) = api_key_from_env(std::env::var(NEWS_API_KEY_ENV).ok()) {
        config.news.api_key = Some(key);
    }

    Ok(config)
}

fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let table: toml::Table = toml::from_str(content)?;
    let model = table.get("model");
    let vectorizer_set = model.and_then(|m| m.get("vectorizer")).is_some();
    let classifier_set = model.and_then(|m| m.get("classifier")).is_some();

    let mut config: Config = toml::Value::Table(table).try_into()?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if vectorizer_set {
        config.model.vectorizer = base.join(&config.model.vectorizer);
    }
    if classifier_set {
        config.model.classifier = base.join(&config.model.classifier);
    }

    Ok(config)
}

/// Blank values do not count as a key.
fn api_key_from_env(value: Option<String>) -> Option<String> {
    value.filter(|k| !k.trim().is_empty())
}

fn find_config_file(workdir: &Path, config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let project_config = workdir.join(".news-checkr").join("config.toml");
    if project_config.exists() {
        return Some(project_config);
    }

    let home_config = dirs::home_dir()?
        .join(".config")
        .join("news-checkr")
        .join("config.toml");
    home_config.exists().then_some(home_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Held by every test that calls `load_config`, which reads the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.model.min_tokens, 5);
        assert_eq!(cfg.news.max_articles, 3);
        assert_eq!(cfg.search.fallback_words, 7);
        assert_eq!(cfg.encyclopedia.summary_sentences, 2);
        assert!(cfg.news.trusted_sources.iter().any(|s| s == "Reuters"));
        assert!(cfg.news.api_key.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
[model]
min_tokens = 8

[news]
trusted_sources = ["Reuters", "BBC News"]
"#;
        let cfg: Config = toml::from_str(toml).unwrap();
        assert_eq!(cfg.model.min_tokens, 8);
        assert_eq!(cfg.model.vectorizer, PathBuf::from("models/vectorizer.json"));
        assert_eq!(cfg.news.trusted_sources.len(), 2);
        assert_eq!(cfg.news.max_articles, 3);
        assert_eq!(cfg.http.timeout_secs, 10);
    }

    #[test]
    fn test_load_from_override() {
        let _guard = env_lock();
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            "[search]\nbase_url = \"https://duckduckgo.com/\"\n[http]\ntimeout_secs = 3\n"
        )
        .unwrap();

        let cfg = load_config(Path::new("/nonexistent"), Some(f.path())).unwrap();
        assert_eq!(cfg.search.base_url, "https://duckduckgo.com/");
        assert_eq!(cfg.http.timeout_secs, 3);
    }

    #[test]
    fn test_project_config_found() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".news-checkr");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[encyclopedia]\nmax_suggestions = 5\n")
            .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.encyclopedia.max_suggestions, 5);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let _guard = env_lock();
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[model]\nmin_tokens = \"many\"\n").unwrap();
        assert!(load_config(Path::new("/nonexistent"), Some(f.path())).is_err());
    }

    #[test]
    fn test_model_paths_relative_to_config_file() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nvectorizer = \"artifacts/vectorizer.json\"\n").unwrap();

        let cfg = load_config(Path::new("/nonexistent"), Some(&path)).unwrap();
        assert_eq!(cfg.model.vectorizer, dir.path().join("artifacts/vectorizer.json"));
        // Not set in the file, so still the working-directory default.
        assert_eq!(cfg.model.classifier, PathBuf::from("models/classifier.json"));
    }

    #[test]
    fn test_absolute_model_path_kept() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nclassifier = \"/opt/models/classifier.json\"\n").unwrap();

        let cfg = load_config(Path::new("/nonexistent"), Some(&path)).unwrap();
        assert_eq!(cfg.model.classifier, PathBuf::from("/opt/models/classifier.json"));
    }

    #[test]
    fn test_api_key_from_env_ignores_blank() {
        assert_eq!(api_key_from_env(Some("abc123".into())), Some("abc123".to_string()));
        assert_eq!(api_key_from_env(Some(String::new())), None);
        assert_eq!(api_key_from_env(Some("   ".into())), None);
        assert_eq!(api_key_from_env(None), None);
    }

    #[test]
    fn test_env_api_key_overrides_file() {
        let _guard = env_lock();
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[news]\napi_key = \"from-file\"\n").unwrap();

        std::env::set_var(NEWS_API_KEY_ENV, "from-env");
        let cfg = load_config(Path::new("/nonexistent"), Some(f.path()));
        std::env::set_var(NEWS_API_KEY_ENV, "  ");
        let blank = load_config(Path::new("/nonexistent"), Some(f.path()));
        std::env::remove_var(NEWS_API_KEY_ENV);

        assert_eq!(cfg.unwrap().news.api_key.as_deref(), Some("from-env"));
        assert_eq!(blank.unwrap().news.api_key.as_deref(), Some("from-file"));
    }
}
