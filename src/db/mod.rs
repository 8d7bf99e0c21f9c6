//! Document store: article persistence on SQLite.
//!
//! - `model`: row types as they come out of queries.
//! - `repo`: SQL-only functions over the pool.
//!
//! The pipeline talks to the store through [`ArticleStore`] so tests can
//! swap in a fake; [`SqliteArticleStore`] is the production implementation.

use async_trait::async_trait;

use crate::error::PersistError;
use crate::model::{ArticleRecord, NewArticle};

pub mod model;
pub mod repo;

pub use repo::*;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleRecord, PersistError>;
}

#[derive(Debug, Clone)]
pub struct SqliteArticleStore {
    pool: Pool,
}

impl SqliteArticleStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleRecord, PersistError> {
        repo::insert_article(&self.pool, article).await
    }
}
