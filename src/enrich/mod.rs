//! Per-topic enrichment: related articles, images and videos.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::http::with_timeout;
use crate::model::{ArticleLink, MediaKind, Outcome, RelatedItem};

pub mod images;
pub mod news;
pub mod videos;

pub use images::UnsplashImages;
pub use news::NewsApiArticles;
pub use videos::YouTubeVideos;

/// Upper bound on items taken from one enrichment source per topic.
pub const MAX_RELATED: usize = 3;

#[async_trait]
pub trait RelatedSource: Send + Sync {
    fn kind(&self) -> MediaKind;

    async fn search(&self, topic: &str) -> Result<Vec<RelatedItem>, ProviderError>;
}

/// Search `source` for `topic`. Any failure, timeout included, yields an
/// empty list tagged as a fallback; nothing is propagated.
pub async fn fetch_related(
    source: &dyn RelatedSource,
    topic: &str,
    timeout: Duration,
) -> Outcome<Vec<RelatedItem>> {
    match with_timeout(timeout, source.search(topic)).await {
        Ok(mut items) => {
            items.truncate(MAX_RELATED);
            debug!(kind = source.kind().as_str(), topic, count = items.len(), "fetched related items");
            Outcome::Success(items)
        }
        Err(err) => {
            warn!(kind = source.kind().as_str(), topic, error = %err, "enrichment failed; continuing without");
            Outcome::Fallback {
                value: Vec::new(),
                reason: err.to_string(),
            }
        }
    }
}

/// Everything gathered for one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub articles: Vec<ArticleLink>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl Enrichment {
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RelatedItem>,
    {
        let mut out = Self::default();
        for item in items {
            match item {
                RelatedItem::Article(link) => out.articles.push(link),
                RelatedItem::Image { url } => out.images.push(url),
                RelatedItem::Video { url } => out.videos.push(url),
            }
        }
        out
    }

    /// Media URLs ordered articles, then images, then videos.
    pub fn media(&self) -> Vec<String> {
        self.articles
            .iter()
            .map(|a| a.url.clone())
            .chain(self.images.iter().cloned())
            .chain(self.videos.iter().cloned())
            .collect()
    }
}

/// The three enrichment sources queried for every topic.
#[derive(Clone)]
pub struct Enricher {
    pub articles: Arc<dyn RelatedSource>,
    pub images: Arc<dyn RelatedSource>,
    pub videos: Arc<dyn RelatedSource>,
}

impl Enricher {
    /// Query all three sources concurrently and wait for every one to settle.
    pub async fn enrich(&self, topic: &str, timeout: Duration) -> Enrichment {
        let (articles, images, videos) = tokio::join!(
            fetch_related(self.articles.as_ref(), topic, timeout),
            fetch_related(self.images.as_ref(), topic, timeout),
            fetch_related(self.videos.as_ref(), topic, timeout),
        );
        Enrichment::from_items(
            articles
                .into_value()
                .into_iter()
                .chain(images.into_value())
                .chain(videos.into_value()),
        )
    }
}
