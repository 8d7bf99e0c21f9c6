use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt;

use super::TrendSource;
use crate::config::TwitterTrends;
use crate::error::ProviderError;
use crate::http::send_text;

const TWITTER_API_BASE: &str = "https://api.twitter.com/";

/// Trending names for one location from the Twitter v1.1 trends API.
#[derive(Clone)]
pub struct TwitterTrendsSource {
    http: Client,
    base_url: String,
    bearer_token: String,
    woeid: u32,
}

impl fmt::Debug for TwitterTrendsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterTrendsSource")
            .field("base_url", &self.base_url)
            .field("woeid", &self.woeid)
            .finish_non_exhaustive()
    }
}

impl TwitterTrendsSource {
    pub fn new(http: Client, cfg: &TwitterTrends) -> Self {
        Self::with_base_url(http, cfg, TWITTER_API_BASE)
    }

    pub fn with_base_url(http: Client, cfg: &TwitterTrends, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            bearer_token: cfg.bearer_token.clone(),
            woeid: cfg.woeid,
        }
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let base = Url::parse(&self.base_url)?;
        let mut url = base.join("1.1/trends/place.json")?;
        url.query_pairs_mut()
            .append_pair("id", &self.woeid.to_string());
        Ok(url)
    }
}

#[async_trait]
impl TrendSource for TwitterTrendsSource {
    fn name(&self) -> &'static str {
        "twitter-trends"
    }

    fn fallback(&self) -> Vec<String> {
        vec!["OpenAI".into(), "Tech".into(), "Sports".into()]
    }

    async fn fetch(&self) -> Result<Vec<String>, ProviderError> {
        let request = self
            .http
            .get(self.endpoint()?)
            .bearer_auth(&self.bearer_token);
        let body = send_text(self.name(), request).await?;
        parse_place_trends(&body)
    }
}

#[derive(Deserialize)]
struct PlaceTrends {
    trends: Vec<Trend>,
}

#[derive(Deserialize)]
struct Trend {
    name: String,
}

pub fn parse_place_trends(body: &str) -> Result<Vec<String>, ProviderError> {
    let places: Vec<PlaceTrends> = serde_json::from_str(body)?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Decode("no locations in response".into()))?;
    Ok(place
        .trends
        .into_iter()
        .map(|t| match t.name.strip_prefix('#') {
            Some(stripped) => stripped.to_string(),
            None => t.name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_leading_hash() {
        let body = r###"[{"trends":[{"name":"#RustLang","tweet_volume":10},{"name":"World Cup"},{"name":"##Double"}],"locations":[{"woeid":1}]}]"###;
        let topics = parse_place_trends(body).unwrap();
        assert_eq!(topics, vec!["RustLang", "World Cup", "#Double"]);
    }

    #[test]
    fn empty_location_list_is_a_decode_error() {
        assert!(matches!(parse_place_trends("[]"), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = TwitterTrends { bearer_token: "secret".into(), woeid: 1 };
        let source = TwitterTrendsSource::new(Client::new(), &cfg);
        assert!(!format!("{:?}", source).contains("secret"));
    }
}
