use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::TrendSource;
use crate::config::GoogleTrends;
use crate::error::ProviderError;
use crate::http::send_text;

const GOOGLE_TRENDS_BASE: &str = "https://trends.google.com/";

/// Daily trending searches from Google Trends for one region.
#[derive(Debug, Clone)]
pub struct GoogleTrendsSource {
    http: Client,
    base_url: String,
    geo: String,
}

impl GoogleTrendsSource {
    pub fn new(http: Client, cfg: &GoogleTrends) -> Self {
        Self::with_base_url(http, cfg, GOOGLE_TRENDS_BASE)
    }

    pub fn with_base_url(http: Client, cfg: &GoogleTrends, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            geo: cfg.geo.clone(),
        }
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let base = Url::parse(&self.base_url)?;
        let mut url = base.join("trends/api/dailytrends")?;
        url.query_pairs_mut()
            .append_pair("hl", "en-US")
            .append_pair("geo", &self.geo)
            .append_pair("ns", "15");
        Ok(url)
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsSource {
    fn name(&self) -> &'static str {
        "google-trends"
    }

    fn fallback(&self) -> Vec<String> {
        vec!["AI".into(), "Climate Change".into(), "SpaceX".into()]
    }

    async fn fetch(&self) -> Result<Vec<String>, ProviderError> {
        let body = send_text(self.name(), self.http.get(self.endpoint()?)).await?;
        parse_daily_trends(&body)
    }
}

#[derive(Deserialize)]
struct DailyTrends {
    default: DailyTrendsDefault,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyTrendsDefault {
    trending_searches_days: Vec<TrendingDay>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendingDay {
    trending_searches: Vec<TrendingSearch>,
}

#[derive(Deserialize)]
struct TrendingSearch {
    title: TrendingTitle,
}

#[derive(Deserialize)]
struct TrendingTitle {
    query: String,
}

/// Parse a daily trends payload, tolerating the `)]}',` guard line Google
/// prepends to its JSON responses.
pub fn parse_daily_trends(body: &str) -> Result<Vec<String>, ProviderError> {
    let json = body.trim_start();
    let json = match json.strip_prefix(")]}'") {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => json,
    };
    let parsed: DailyTrends = serde_json::from_str(json)?;
    let day = parsed
        .default
        .trending_searches_days
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Decode("no trending days in response".into()))?;
    Ok(day
        .trending_searches
        .into_iter()
        .map(|s| s.title.query)
        .collect())
}
