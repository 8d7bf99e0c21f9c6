use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TopicError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Tagged result of an adapter that never fails past its own boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Fallback { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Article,
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Article => "article",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleLink {
    pub title: String,
    pub url: String,
    pub source: String,
}

/// One search hit produced by an enrichment adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelatedItem {
    Article(ArticleLink),
    Image { url: String },
    Video { url: String },
}

impl RelatedItem {
    pub fn url(&self) -> &str {
        match self {
            RelatedItem::Article(link) => &link.url,
            RelatedItem::Image { url } | RelatedItem::Video { url } => url,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            RelatedItem::Article(_) => MediaKind::Article,
            RelatedItem::Image { .. } => MediaKind::Image,
            RelatedItem::Video { .. } => MediaKind::Video,
        }
    }
}

/// Article body returned by the generator. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent(String);

impl GeneratedContent {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Article ready to be handed to the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub meta: String,
    pub media: Vec<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewArticle {
    /// Assemble the persistable record for `topic`; `media` must already be
    /// ordered articles, then images, then videos.
    pub fn for_topic(topic: &str, media: Vec<String>, content: GeneratedContent) -> Self {
        Self {
            title: topic.to_string(),
            slug: slugify(topic),
            meta: format!("SEO blog post about {}", topic),
            media,
            content: content.into_string(),
            created_at: Utc::now(),
        }
    }
}

/// Article as stored by the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub meta: String,
    pub media: Vec<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TopicFailure {
    pub topic: String,
    pub error: TopicError,
}

/// Aggregate of one pipeline invocation.
#[derive(Debug)]
pub struct PipelineRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
    pub articles: Vec<ArticleRecord>,
    pub failures: Vec<TopicFailure>,
}

impl PipelineRun {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            topics: Vec::new(),
            articles: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: Result<ArticleRecord, TopicFailure>) {
        match outcome {
            Ok(article) => self.articles.push(article),
            Err(failure) => self.failures.push(failure),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

/// Lower-cases the topic and turns each whitespace run into a single `-`.
pub fn slugify(topic: &str) -> String {
    WHITESPACE
        .replace_all(&topic.trim().to_lowercase(), "-")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_examples() {
        assert_eq!(slugify("Climate Change"), "climate-change");
        assert_eq!(slugify("AI"), "ai");
        assert_eq!(slugify("  New   York\tKnicks "), "new-york-knicks");
    }

    #[test]
    fn generated_content_rejects_blank_text() {
        assert!(GeneratedContent::new("").is_none());
        assert!(GeneratedContent::new(" \n ").is_none());
        assert_eq!(GeneratedContent::new("# Title").unwrap().as_str(), "# Title");
    }

    #[test]
    fn new_article_derives_slug_and_meta() {
        let content = GeneratedContent::new("body").unwrap();
        let article = NewArticle::for_topic("Climate Change", vec!["https://a".into()], content);
        assert_eq!(article.title, "Climate Change");
        assert_eq!(article.slug, "climate-change");
        assert_eq!(article.meta, "SEO blog post about Climate Change");
        assert_eq!(article.media, vec!["https://a".to_string()]);
    }

    #[test]
    fn outcome_exposes_value_for_both_tags() {
        let ok = Outcome::Success(vec![1]);
        let degraded = Outcome::Fallback { value: vec![2], reason: "down".into() };
        assert!(!ok.is_fallback());
        assert!(degraded.is_fallback());
        assert_eq!(ok.value(), &vec![1]);
        assert_eq!(degraded.into_value(), vec![2]);
    }

    #[test]
    fn related_item_url_and_kind() {
        let item = RelatedItem::Video { url: "https://v".into() };
        assert_eq!(item.url(), "https://v");
        assert_eq!(item.kind(), MediaKind::Video);
    }
}
