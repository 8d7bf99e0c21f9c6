//! Pipeline orchestrator: discover, dedupe, then enrich, generate and
//! persist every topic, collecting per-topic outcomes into a [`PipelineRun`].
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::{Config, Timeouts};
use crate::db::ArticleStore;
use crate::enrich::{Enricher, NewsApiArticles, UnsplashImages, YouTubeVideos};
use crate::error::{GenerationError, PersistError, RunError, TopicError};
use crate::generate::{ContentGenerator, GeminiClient};
use crate::http::with_timeout;
use crate::model::{ArticleRecord, NewArticle, PipelineRun, TopicFailure};
use crate::trends::{dedupe, fetch_trends, GoogleTrendsSource, TrendSource, TwitterTrendsSource};

#[derive(Clone)]
pub struct Pipeline {
    trends_a: Arc<dyn TrendSource>,
    trends_b: Arc<dyn TrendSource>,
    enricher: Enricher,
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn ArticleStore>,
    timeouts: Timeouts,
    topic_concurrency: usize,
}

impl Pipeline {
    pub fn new(
        trends_a: Arc<dyn TrendSource>,
        trends_b: Arc<dyn TrendSource>,
        enricher: Enricher,
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            trends_a,
            trends_b,
            enricher,
            generator,
            store,
            timeouts: Timeouts::default(),
            topic_concurrency: 1,
        }
    }

    /// Wire the real provider adapters from configuration.
    pub fn from_config(cfg: &Config, http: Client, store: Arc<dyn ArticleStore>) -> Self {
        let enricher = Enricher {
            articles: Arc::new(NewsApiArticles::new(http.clone(), &cfg.enrichment.news_api_key)),
            images: Arc::new(UnsplashImages::new(http.clone(), &cfg.enrichment.unsplash_access_key)),
            videos: Arc::new(YouTubeVideos::new(http.clone(), &cfg.enrichment.youtube_api_key)),
        };
        Self::new(
            Arc::new(GoogleTrendsSource::new(http.clone(), &cfg.trends.google)),
            Arc::new(TwitterTrendsSource::new(http.clone(), &cfg.trends.twitter)),
            enricher,
            Arc::new(GeminiClient::new(http, &cfg.generation)),
            store,
        )
        .with_timeouts(cfg.timeouts.clone())
        .with_topic_concurrency(cfg.app.topic_concurrency)
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Number of topics processed at once; 1 keeps the run sequential.
    pub fn with_topic_concurrency(mut self, n: usize) -> Self {
        self.topic_concurrency = n.max(1);
        self
    }

    /// Current topics from source B alone, fallback included.
    pub async fn secondary_trends(&self) -> Vec<String> {
        fetch_trends(self.trends_b.as_ref(), self.timeouts.trend())
            .await
            .into_value()
    }

    /// Execute one full run. Only a run that cannot start returns `Err`;
    /// topic failures are recorded in the returned run.
    #[instrument(skip_all)]
    pub async fn run(&self) -> Result<PipelineRun, RunError> {
        if !self.generator.is_configured() {
            return Err(RunError::Unconfigured("content generator has no credentials"));
        }

        let mut run = PipelineRun::start();
        info!(run_id = %run.id, "pipeline run started");

        run.topics = self.discover().await;

        let outcomes: Vec<Result<ArticleRecord, TopicFailure>> = stream::iter(run.topics.clone())
            .map(|topic| self.process_topic(topic))
            .buffered(self.topic_concurrency)
            .collect()
            .await;
        for outcome in outcomes {
            run.record(outcome);
        }

        run.finish();
        info!(
            run_id = %run.id,
            topics = run.topics.len(),
            succeeded = run.articles.len(),
            failed = run.failures.len(),
            "pipeline run finished"
        );
        Ok(run)
    }

    /// Query both trend sources concurrently and merge their topics.
    pub async fn discover(&self) -> Vec<String> {
        let timeout = self.timeouts.trend();
        let (a, b) = tokio::join!(
            fetch_trends(self.trends_a.as_ref(), timeout),
            fetch_trends(self.trends_b.as_ref(), timeout),
        );
        let topics = dedupe(a.value(), b.value());
        info!(?topics, "discovered topics");
        topics
    }

    #[instrument(skip_all, fields(topic = %topic))]
    async fn process_topic(&self, topic: String) -> Result<ArticleRecord, TopicFailure> {
        let result = self.try_topic(&topic).await;
        match result {
            Ok(article) => {
                info!(slug = %article.slug, media = article.media.len(), "article stored");
                Ok(article)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "topic failed");
                Err(TopicFailure { topic, error })
            }
        }
    }

    async fn try_topic(&self, topic: &str) -> Result<ArticleRecord, TopicError> {
        let enrichment = self.enricher.enrich(topic, self.timeouts.enrichment()).await;

        let content = with_timeout::<_, GenerationError, _>(
            self.timeouts.generation(),
            self.generator.generate(topic, &enrichment.articles),
        )
        .await?;

        let article = NewArticle::for_topic(topic, enrichment.media(), content);
        let limit = self.timeouts.persist();
        let stored = match tokio::time::timeout(limit, self.store.create_article(&article)).await {
            Ok(res) => res?,
            Err(_) => return Err(PersistError::Timeout(limit).into()),
        };
        Ok(stored)
    }
}
