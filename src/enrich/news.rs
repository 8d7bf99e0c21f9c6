use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{RelatedSource, MAX_RELATED};
use crate::error::ProviderError;
use crate::http::send_text;
use crate::model::{ArticleLink, MediaKind, RelatedItem};

const NEWS_API_BASE: &str = "https://newsapi.org/";

/// Latest articles mentioning a topic, from NewsAPI `/v2/everything`.
#[derive(Clone)]
pub struct NewsApiArticles {
    http: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiArticles {
    pub fn new(http: Client, api_key: &str) -> Self {
        Self::with_base_url(http, api_key, NEWS_API_BASE)
    }

    pub fn with_base_url(http: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, topic: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)?.join("v2/everything")?;
        url.query_pairs_mut()
            .append_pair("q", topic)
            .append_pair("sortBy", "publishedAt")
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl RelatedSource for NewsApiArticles {
    fn kind(&self) -> MediaKind {
        MediaKind::Article
    }

    async fn search(&self, topic: &str) -> Result<Vec<RelatedItem>, ProviderError> {
        let body = send_text("newsapi", self.http.get(self.endpoint(topic)?)).await?;
        parse_everything(&body)
    }
}

#[derive(Deserialize)]
struct Everything {
    articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
struct NewsArticle {
    #[serde(default)]
    title: Option<String>,
    url: String,
    source: NewsSource,
}

#[derive(Deserialize)]
struct NewsSource {
    #[serde(default)]
    name: Option<String>,
}

pub fn parse_everything(body: &str) -> Result<Vec<RelatedItem>, ProviderError> {
    let parsed: Everything = serde_json::from_str(body)?;
    Ok(parsed
        .articles
        .into_iter()
        .take(MAX_RELATED)
        .map(|a| {
            RelatedItem::Article(ArticleLink {
                title: a.title.unwrap_or_default(),
                url: a.url,
                source: a.source.name.unwrap_or_default(),
            })
        })
        .collect())
}
