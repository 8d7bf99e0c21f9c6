use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use trendwise::config;
use trendwise::db::{self, SqliteArticleStore};
use trendwise::http;
use trendwise::pipeline::Pipeline;
use trendwise::report;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run the crawler pipeline once and print the report as JSON"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override app.topic_concurrency
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url());
    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(SqliteArticleStore::new(pool));
    let mut pipeline = Pipeline::from_config(&cfg, http::client()?, store);
    if let Some(n) = args.concurrency {
        pipeline = pipeline.with_topic_concurrency(n);
    }

    let run = pipeline.run().await?;
    let report = report::format(&run);
    if report.errors.is_some() {
        warn!(failed = run.failures.len(), "some topics failed");
    }
    info!(run_id = %run.id, articles = run.articles.len(), "run complete");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
