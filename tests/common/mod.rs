use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use trendwise::db::{self, ArticleStore, SqliteArticleStore};
use trendwise::enrich::{Enricher, RelatedSource};
use trendwise::error::{GenerationError, PersistError, ProviderError};
use trendwise::generate::ContentGenerator;
use trendwise::model::{ArticleLink, ArticleRecord, GeneratedContent, MediaKind, NewArticle, RelatedItem};
use trendwise::trends::TrendSource;

pub async fn setup_pool() -> sqlx::SqlitePool {
    // one connection, otherwise each pooled connection gets its own empty memory db
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Trend source answering with a fixed list, or failing and exposing a fallback.
pub struct ScriptedTrends {
    pub name: &'static str,
    pub topics: Option<Vec<String>>,
    pub fallback: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedTrends {
    pub fn ok(name: &'static str, topics: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            topics: Some(strings(topics)),
            fallback: strings(&["Fallback"]),
            calls: AtomicUsize::new(0),
        })
    }

    /// Answers with `topics`; `fallback` is what the run gets if that answer is unusable.
    #[allow(dead_code)]
    pub fn ok_with_fallback(name: &'static str, topics: &[&str], fallback: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            topics: Some(strings(topics)),
            fallback: strings(fallback),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &'static str, fallback: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            topics: None,
            fallback: strings(fallback),
            calls: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrendSource for ScriptedTrends {
    fn name(&self) -> &'static str {
        self.name
    }

    fn fallback(&self) -> Vec<String> {
        self.fallback.clone()
    }

    async fn fetch(&self) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.topics.clone().ok_or(ProviderError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

/// Enrichment source returning the same items for every topic.
pub struct FixedRelated {
    pub kind: MediaKind,
    pub items: Option<Vec<RelatedItem>>,
}

impl FixedRelated {
    pub fn empty(kind: MediaKind) -> Arc<Self> {
        Arc::new(Self { kind, items: Some(vec![]) })
    }

    #[allow(dead_code)]
    pub fn with(kind: MediaKind, items: Vec<RelatedItem>) -> Arc<Self> {
        Arc::new(Self { kind, items: Some(items) })
    }

    #[allow(dead_code)]
    pub fn failing(kind: MediaKind) -> Arc<Self> {
        Arc::new(Self { kind, items: None })
    }
}

#[async_trait]
impl RelatedSource for FixedRelated {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    async fn search(&self, _topic: &str) -> Result<Vec<RelatedItem>, ProviderError> {
        self.items.clone().ok_or(ProviderError::Status {
            status: 429,
            body: "rate limited".into(),
        })
    }
}

pub fn empty_enricher() -> Enricher {
    Enricher {
        articles: FixedRelated::empty(MediaKind::Article),
        images: FixedRelated::empty(MediaKind::Image),
        videos: FixedRelated::empty(MediaKind::Video),
    }
}

#[allow(dead_code)]
pub fn article_link(n: u32) -> ArticleLink {
    ArticleLink {
        title: format!("Story {n}"),
        url: format!("https://news.example/{n}"),
        source: "Example Wire".into(),
    }
}

/// Generator that writes a canned body, except for topics scripted to fail
/// or to hang.
#[derive(Default)]
pub struct RecordingGenerator {
    pub failing: Vec<String>,
    pub slow: HashMap<String, Duration>,
    pub unconfigured: bool,
    pub calls: Mutex<Vec<(String, Vec<ArticleLink>)>>,
}

impl RecordingGenerator {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_for(topics: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing: strings(topics),
            ..Default::default()
        })
    }

    #[allow(dead_code)]
    pub async fn calls(&self) -> Vec<(String, Vec<ArticleLink>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ContentGenerator for RecordingGenerator {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn generate(
        &self,
        topic: &str,
        related: &[ArticleLink],
    ) -> Result<GeneratedContent, GenerationError> {
        self.calls
            .lock()
            .await
            .push((topic.to_string(), related.to_vec()));
        if let Some(delay) = self.slow.get(topic) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|t| t == topic) {
            return Err(GenerationError::NoCandidate);
        }
        Ok(GeneratedContent::new(format!("# {topic}\n\n## Overview\n\n### Details\n\nSummary."))
            .unwrap())
    }
}

/// Store that records attempts and always refuses.
#[allow(dead_code)]
#[derive(Default)]
pub struct DownStore {
    pub attempts: Mutex<Vec<String>>,
}

#[async_trait]
impl ArticleStore for DownStore {
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleRecord, PersistError> {
        self.attempts.lock().await.push(article.slug.clone());
        Err(PersistError::Unavailable("connection refused".into()))
    }
}

pub async fn sqlite_store() -> Arc<SqliteArticleStore> {
    Arc::new(SqliteArticleStore::new(setup_pool().await))
}

#[allow(dead_code)]
pub async fn stored_count(store: &SqliteArticleStore) -> i64 {
    db::count_articles(store.pool()).await.unwrap()
}
