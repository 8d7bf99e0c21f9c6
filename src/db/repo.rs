use super::model::ArticleRow;
use crate::error::PersistError;
use crate::model::{ArticleRecord, NewArticle};
use anyhow::Result;
use sqlx::SqlitePool;
use tracing::instrument;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous=FULL;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// Make a file-backed SQLite URL usable: expand a leading `~/`, create the
/// parent directory and ask SQLite to create the file. In-memory and
/// non-sqlite URLs pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return url.to_string();
    }

    let path = match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(tail), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), tail),
        _ => path.to_string(),
    };
    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    match query {
        Some(q) if q.contains("mode=") => format!("sqlite://{}?{}", path, q),
        Some(q) => format!("sqlite://{}?{}&mode=rwc", path, q),
        None => format!("sqlite://{}?mode=rwc", path),
    }
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Insert one article; a taken slug is reported as [`PersistError::DuplicateSlug`].
#[instrument(skip_all, fields(slug = %article.slug))]
pub async fn insert_article(pool: &Pool, article: &NewArticle) -> Result<ArticleRecord, PersistError> {
    let media = serde_json::to_string(&article.media)?;
    let res = sqlx::query_scalar::<_, i64>(
        "INSERT INTO articles (title, slug, meta, media, content, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&article.meta)
    .bind(&media)
    .bind(&article.content)
    .bind(article.created_at)
    .fetch_one(pool)
    .await;

    let id = match res {
        Ok(id) => id,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(PersistError::DuplicateSlug(article.slug.clone()));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ArticleRecord {
        id,
        title: article.title.clone(),
        slug: article.slug.clone(),
        meta: article.meta.clone(),
        media: article.media.clone(),
        content: article.content.clone(),
        created_at: article.created_at,
    })
}

#[instrument(skip_all)]
pub async fn get_article_by_slug(pool: &Pool, slug: &str) -> Result<Option<ArticleRecord>, PersistError> {
    let row = sqlx::query_as::<_, ArticleRow>(
        "SELECT id, title, slug, meta, media, content, created_at FROM articles WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    row.map(ArticleRecord::try_from).transpose()
}

#[instrument(skip_all)]
pub async fn count_articles(pool: &Pool) -> Result<i64, PersistError> {
    Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?)
}
