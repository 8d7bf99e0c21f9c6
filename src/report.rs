//! Caller-facing summary of a pipeline run.
use serde::Serialize;

use crate::model::{ArticleRecord, PipelineRun};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Report {
    pub message: String,
    pub articles: Vec<ArticleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ReportedFailure>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportedFailure {
    pub topic: String,
    pub kind: String,
    pub details: String,
}

/// Pure transformation of a run into its report; `errors` is only present
/// when at least one topic failed.
pub fn format(run: &PipelineRun) -> Report {
    let errors: Vec<ReportedFailure> = run
        .failures
        .iter()
        .map(|f| ReportedFailure {
            topic: f.topic.clone(),
            kind: f.error.kind().to_string(),
            details: f.error.to_string(),
        })
        .collect();

    let message = if errors.is_empty() {
        "Crawler completed".to_string()
    } else {
        format!(
            "Crawler completed with {} of {} topics failed",
            errors.len(),
            run.topics.len()
        )
    };

    Report {
        message,
        articles: run.articles.clone(),
        errors: if errors.is_empty() { None } else { Some(errors) },
    }
}
