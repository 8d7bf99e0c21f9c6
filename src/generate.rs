//! Long-form article generation through the Gemini `generateContent` API.
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::config::Generation;
use crate::error::{GenerationError, ProviderError};
use crate::http::send_text;
use crate::model::{ArticleLink, GeneratedContent};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/";

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Whether the generator has what it needs to be called at all.
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        topic: &str,
        related: &[ArticleLink],
    ) -> Result<GeneratedContent, GenerationError>;
}

/// Instruction sent to the model for one topic.
pub fn build_prompt(topic: &str, related: &[ArticleLink]) -> String {
    let urls: Vec<&str> = related.iter().map(|a| a.url.as_str()).collect();
    format!(
        "Write a detailed, SEO-optimized blog post about \"{}\". Include H1, H2, H3, meta description, and references to these articles: {}.",
        topic,
        urls.join(", ")
    )
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(http: Client, cfg: &Generation) -> Self {
        Self::with_base_url(http, cfg, GEMINI_API_BASE)
    }

    pub fn with_base_url(http: Client, cfg: &Generation, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        }
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        let mut url = Url::parse(&self.base_url)?.join(&path)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn generate(
        &self,
        topic: &str,
        related: &[ArticleLink],
    ) -> Result<GeneratedContent, GenerationError> {
        let body = GenerateRequest::single(build_prompt(topic, related));
        let request = self.http.post(self.endpoint()?).json(&body);
        let text = send_text("gemini", request).await?;
        let content = first_candidate_text(&text)?;
        info!(topic, chars = content.as_str().len(), "generated article body");
        Ok(content)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn single(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Extract the text of the first part of the first candidate.
pub fn first_candidate_text(body: &str) -> Result<GeneratedContent, GenerationError> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(ProviderError::from)?;
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| GeneratedContent::new(p.text))
        .ok_or(GenerationError::NoCandidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str) -> ArticleLink {
        ArticleLink {
            title: "t".into(),
            url: url.into(),
            source: "s".into(),
        }
    }

    #[test]
    fn prompt_embeds_topic_and_urls() {
        let prompt = build_prompt("Climate Change", &[link("https://a"), link("https://b")]);
        assert!(prompt.contains("\"Climate Change\""));
        assert!(prompt.contains("H1, H2, H3, meta description"));
        assert!(prompt.ends_with("these articles: https://a, https://b."));
    }

    #[test]
    fn prompt_without_articles_still_well_formed() {
        let prompt = build_prompt("AI", &[]);
        assert!(prompt.ends_with("these articles: ."));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::single("hi".into())).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn extracts_first_candidate() {
        let body = r##"{"candidates":[{"content":{"parts":[{"text":"# Title\nBody"}],"role":"model"}},{"content":{"parts":[{"text":"other"}]}}]}"##;
        assert_eq!(first_candidate_text(body).unwrap().as_str(), "# Title\nBody");
    }

    #[test]
    fn missing_or_blank_candidate_is_an_error() {
        assert!(matches!(first_candidate_text(r#"{"candidates":[]}"#), Err(GenerationError::NoCandidate)));
        assert!(matches!(first_candidate_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#), Err(GenerationError::NoCandidate)));
        assert!(matches!(
            first_candidate_text(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(GenerationError::NoCandidate)
        ));
        assert!(matches!(first_candidate_text("nope"), Err(GenerationError::Request(ProviderError::Decode(_)))));
    }

    #[test]
    fn configured_only_with_api_key() {
        let cfg = Generation { api_key: "".into(), model: "gemini-pro".into() };
        assert!(!GeminiClient::new(Client::new(), &cfg).is_configured());
        let cfg = Generation { api_key: "k".into(), model: "gemini-pro".into() };
        let client = GeminiClient::new(Client::new(), &cfg);
        assert!(client.is_configured());
        assert_eq!(client.endpoint().unwrap().path(), "/v1beta/models/gemini-pro:generateContent");
    }
}
