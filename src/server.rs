//! HTTP ingress for the crawler.
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::pipeline::Pipeline;
use crate::report;

pub struct AppState {
    pub pipeline: Pipeline,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/crawler/run", post(run_crawler))
        .route("/api/crawler/twitter-trends", get(twitter_trends))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn index() -> &'static str {
    "TrendWise Backend API"
}

async fn run_crawler(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.run().await {
        Ok(run) => Json(report::format(&run)).into_response(),
        Err(err) => {
            error!(%err, "crawler run could not start");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Crawler error", "details": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn twitter_trends(State(state): State<Arc<AppState>>) -> Response {
    let trends = state.pipeline.secondary_trends().await;
    Json(json!({ "trends": trends })).into_response()
}
