//! Configuration loader and validator for the trend crawler.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub timeouts: Timeouts,
    pub trends: Trends,
    pub enrichment: Enrichment,
    pub generation: Generation,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub data_dir: String,
    pub bind: String,
    #[serde(default = "default_topic_concurrency")]
    pub topic_concurrency: usize,
}

/// Per-call timeouts for every external collaborator, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeouts {
    pub trend_ms: u64,
    pub enrichment_ms: u64,
    pub generation_ms: u64,
    pub persist_ms: u64,
}

/// Trend provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trends {
    pub google: GoogleTrends,
    pub twitter: TwitterTrends,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleTrends {
    #[serde(default = "default_geo")]
    pub geo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TwitterTrends {
    #[serde(default)]
    pub bearer_token: String,
    /// Where-on-earth id; 1 is worldwide.
    #[serde(default = "default_woeid")]
    pub woeid: u32,
}

/// Search provider credentials used to enrich each topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enrichment {
    #[serde(default)]
    pub news_api_key: String,
    #[serde(default)]
    pub unsplash_access_key: String,
    #[serde(default)]
    pub youtube_api_key: String,
}

/// Generative-text provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generation {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_topic_concurrency() -> usize {
    1
}

fn default_geo() -> String {
    "US".into()
}

fn default_woeid() -> u32 {
    1
}

fn default_model() -> String {
    "gemini-pro".into()
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.data_dir)
    }

    /// Default SQLite location inside the data directory.
    pub fn database_url(&self) -> String {
        format!(
            "sqlite://{}/trendwise.db",
            self.app.data_dir.trim_end_matches('/')
        )
    }
}

impl Timeouts {
    pub fn trend(&self) -> Duration {
        Duration::from_millis(self.trend_ms)
    }

    pub fn enrichment(&self) -> Duration {
        Duration::from_millis(self.enrichment_ms)
    }

    pub fn generation(&self) -> Duration {
        Duration::from_millis(self.generation_ms)
    }

    pub fn persist(&self) -> Duration {
        Duration::from_millis(self.persist_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            trend_ms: 10_000,
            enrichment_ms: 10_000,
            generation_ms: 60_000,
            persist_ms: 5_000,
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
///
/// Provider credentials may be blank here: trend and enrichment adapters
/// degrade without them, and the pipeline refuses to start a run when the
/// generator has none.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.app.bind.trim().is_empty() {
        return Err(ConfigError::Invalid("app.bind must be non-empty"));
    }
    if cfg.app.topic_concurrency == 0 {
        return Err(ConfigError::Invalid("app.topic_concurrency must be > 0"));
    }

    let t = &cfg.timeouts;
    if t.trend_ms == 0 {
        return Err(ConfigError::Invalid("timeouts.trend_ms must be > 0"));
    }
    if t.enrichment_ms == 0 {
        return Err(ConfigError::Invalid("timeouts.enrichment_ms must be > 0"));
    }
    if t.generation_ms == 0 {
        return Err(ConfigError::Invalid("timeouts.generation_ms must be > 0"));
    }
    if t.persist_ms == 0 {
        return Err(ConfigError::Invalid("timeouts.persist_ms must be > 0"));
    }

    if cfg.trends.google.geo.trim().is_empty() {
        return Err(ConfigError::Invalid("trends.google.geo must be non-empty"));
    }
    if cfg.generation.model.trim().is_empty() {
        return Err(ConfigError::Invalid("generation.model must be non-empty"));
    }

    Ok(())
}

/// Returns the example YAML shipped with the service.
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"
  bind: "0.0.0.0:5000"
  topic_concurrency: 1

timeouts:
  trend_ms: 10000
  enrichment_ms: 10000
  generation_ms: 60000
  persist_ms: 5000

trends:
  google:
    geo: "US"
  twitter:
    bearer_token: "YOUR_TWITTER_BEARER_TOKEN"
    woeid: 1

enrichment:
  news_api_key: "YOUR_NEWSAPI_KEY"
  unsplash_access_key: "YOUR_UNSPLASH_ACCESS_KEY"
  youtube_api_key: "YOUR_YOUTUBE_API_KEY"

generation:
  api_key: "YOUR_GEMINI_API_KEY"
  model: "gemini-pro"
"#
}
