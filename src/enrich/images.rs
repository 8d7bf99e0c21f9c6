use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{RelatedSource, MAX_RELATED};
use crate::error::ProviderError;
use crate::http::send_text;
use crate::model::{MediaKind, RelatedItem};

const UNSPLASH_API_BASE: &str = "https://api.unsplash.com/";

/// Photo search via the Unsplash API.
#[derive(Clone)]
pub struct UnsplashImages {
    http: Client,
    base_url: String,
    access_key: String,
}

impl UnsplashImages {
    pub fn new(http: Client, access_key: &str) -> Self {
        Self::with_base_url(http, access_key, UNSPLASH_API_BASE)
    }

    pub fn with_base_url(http: Client, access_key: &str, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            access_key: access_key.to_string(),
        }
    }

    fn endpoint(&self, topic: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)?.join("search/photos")?;
        url.query_pairs_mut()
            .append_pair("query", topic)
            .append_pair("per_page", &MAX_RELATED.to_string())
            .append_pair("client_id", &self.access_key);
        Ok(url)
    }
}

#[async_trait]
impl RelatedSource for UnsplashImages {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    async fn search(&self, topic: &str) -> Result<Vec<RelatedItem>, ProviderError> {
        let body = send_text("unsplash", self.http.get(self.endpoint(topic)?)).await?;
        parse_photos(&body)
    }
}

#[derive(Deserialize)]
struct PhotoSearch {
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

pub fn parse_photos(body: &str) -> Result<Vec<RelatedItem>, ProviderError> {
    let parsed: PhotoSearch = serde_json::from_str(body)?;
    Ok(parsed
        .results
        .into_iter()
        .map(|p| RelatedItem::Image { url: p.urls.regular })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_regular_urls() {
        let body = r#"{"total":2,"results":[
            {"id":"a","urls":{"raw":"r","regular":"https://img/a"}},
            {"id":"b","urls":{"regular":"https://img/b","small":"s"}}
        ]}"#;
        let items = parse_photos(body).unwrap();
        assert_eq!(
            items,
            vec![
                RelatedItem::Image { url: "https://img/a".into() },
                RelatedItem::Image { url: "https://img/b".into() },
            ]
        );
    }

    #[test]
    fn endpoint_requests_page_of_three() {
        let source = UnsplashImages::new(Client::new(), "key");
        let url = source.endpoint("AI").unwrap();
        assert_eq!(url.path(), "/search/photos");
        assert!(url.query().unwrap().contains("per_page=3"));
    }
}
