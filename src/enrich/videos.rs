use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{RelatedSource, MAX_RELATED};
use crate::error::ProviderError;
use crate::http::send_text;
use crate::model::{MediaKind, RelatedItem};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Video search via the YouTube Data API v3.
#[derive(Clone)]
pub struct YouTubeVideos {
    http: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeVideos {
    pub fn new(http: Client, api_key: &str) -> Self {
        Self::with_base_url(http, api_key, YOUTUBE_API_BASE)
    }

    pub fn with_base_url(http: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, topic: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)?.join("youtube/v3/search")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("q", topic)
            .append_pair("type", "video")
            .append_pair("maxResults", &MAX_RELATED.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl RelatedSource for YouTubeVideos {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    async fn search(&self, topic: &str) -> Result<Vec<RelatedItem>, ProviderError> {
        let body = send_text("youtube", self.http.get(self.endpoint(topic)?)).await?;
        parse_search(&body)
    }
}

#[derive(Deserialize)]
struct SearchList {
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

/// Items without a video id (channels, playlists) are skipped.
pub fn parse_search(body: &str) -> Result<Vec<RelatedItem>, ProviderError> {
    let parsed: SearchList = serde_json::from_str(body)?;
    Ok(parsed
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .map(|id| RelatedItem::Video {
            url: format!("{}{}", WATCH_URL, id),
        })
        .collect())
}
