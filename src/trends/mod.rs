//! Trend discovery: the two trend sources and topic deduplication.
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::http::with_timeout;
use crate::model::Outcome;

pub mod google;
pub mod twitter;

pub use google::GoogleTrendsSource;
pub use twitter::TwitterTrendsSource;

/// Upper bound on topics taken from one trend source.
pub const MAX_TRENDS: usize = 3;

#[async_trait]
pub trait TrendSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Static list substituted when the provider cannot be used.
    fn fallback(&self) -> Vec<String>;

    async fn fetch(&self) -> Result<Vec<String>, ProviderError>;
}

/// Fetch up to [`MAX_TRENDS`] topics from `source`, degrading to its
/// fallback list on error, timeout or an empty answer.
pub async fn fetch_trends(source: &dyn TrendSource, timeout: Duration) -> Outcome<Vec<String>> {
    let reason = match with_timeout(timeout, source.fetch()).await {
        Ok(raw) => {
            let topics: Vec<String> = raw
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .take(MAX_TRENDS)
                .collect();
            if !topics.is_empty() {
                info!(source = source.name(), ?topics, "fetched trends");
                return Outcome::Success(topics);
            }
            "provider returned no trends".to_string()
        }
        Err(err) => err.to_string(),
    };
    warn!(source = source.name(), error = %reason, "trend source degraded; using fallback");
    Outcome::Fallback {
        value: source.fallback(),
        reason,
    }
}

/// Concatenate `a` then `b` and drop repeats by exact string equality,
/// keeping the first occurrence. Case is significant: "AI" and "ai" both stay.
pub fn dedupe(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    a.iter()
        .chain(b.iter())
        .filter(|topic| seen.insert(topic.as_str()))
        .cloned()
        .collect()
}
