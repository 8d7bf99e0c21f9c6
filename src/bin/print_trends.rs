use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use trendwise::config;
use trendwise::http;
use trendwise::model::Outcome;
use trendwise::trends::{dedupe, fetch_trends, GoogleTrendsSource, TrendSource, TwitterTrendsSource};

#[derive(Debug, Parser)]
#[command(author, version, about = "Print what both trend sources return right now")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

fn describe(source: &dyn TrendSource, outcome: &Outcome<Vec<String>>) {
    match outcome {
        Outcome::Success(topics) => println!("{}: {}", source.name(), topics.join(", ")),
        Outcome::Fallback { value, reason } => println!(
            "{}: {} (fallback: {})",
            source.name(),
            value.join(", "),
            reason
        ),
    }
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
    let client = http::client()?;

    let google = GoogleTrendsSource::new(client.clone(), &cfg.trends.google);
    let twitter = TwitterTrendsSource::new(client, &cfg.trends.twitter);
    let timeout = cfg.timeouts.trend();

    let (a, b) = tokio::join!(fetch_trends(&google, timeout), fetch_trends(&twitter, timeout));
    describe(&google, &a);
    describe(&twitter, &b);
    println!("topics: {}", dedupe(a.value(), b.value()).join(", "));
    Ok(())
}
