//! Error types shared by the adapters, the store and the orchestrator.
use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to an external provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

/// Content generation failed; fatal for the topic being processed.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(#[from] ProviderError),
    #[error("generation returned no candidate text")]
    NoCandidate,
}

/// The document store rejected or could not take an article.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("an article with slug '{0}' already exists")]
    DuplicateSlug(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to encode article media: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Reasons a topic ended without a persisted article.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl TopicError {
    /// Stable short label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TopicError::Generation(_) => "generation",
            TopicError::Persist(_) => "persist",
        }
    }
}

/// A run that could not even start discovering topics.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("pipeline is not configured: {0}")]
    Unconfigured(&'static str),
}
