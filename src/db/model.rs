//! Row types returned by repositories.
//!
//! Rows mirror the `articles` table; conversion into domain records lives
//! here so callers never see the JSON-encoded media column.

use chrono::{DateTime, Utc};

use crate::error::PersistError;
use crate::model::ArticleRecord;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub meta: String,
    pub media: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for ArticleRecord {
    type Error = PersistError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(ArticleRecord {
            id: row.id,
            title: row.title,
            slug: row.slug,
            meta: row.meta,
            media: serde_json::from_str(&row.media)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}
