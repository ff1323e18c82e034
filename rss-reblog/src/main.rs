use clap::Parser;
use rss_reblog::config::PUBLISH_TIMEOUT_SECONDS;
use rss_reblog::{
    CliOverrides, FeedSource, OpenAiAdapter, PublishPipeline, ReblogConfig, RssFeedSource,
    SharkeyPublisher, StatusComposer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Loads an RSS feed, picks old articles and re-publishes them on a
/// Sharkey/Misskey instance.
#[derive(Debug, Parser)]
#[command(name = "rss-reblog", version)]
struct Args {
    /// RSS feed URL
    #[arg(long)]
    feed_url: Option<String>,

    /// Minimum age of articles in days
    #[arg(long)]
    days_old: Option<i64>,

    /// Maximum number of articles published per run (<= 0 means one)
    #[arg(long, allow_negative_numbers = true)]
    max_posts: Option<i64>,

    /// File recording already posted URLs
    #[arg(long)]
    posted_log: Option<PathBuf>,

    /// Print the composed notes instead of publishing them
    #[arg(long)]
    dry_run: bool,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            feed_url: args.feed_url,
            days_old: args.days_old,
            max_posts: args.max_posts,
            posted_log: args.posted_log,
            dry_run: args.dry_run,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ReblogConfig::from_env(args.into())?;

    info!(
        "Loading feed {} and selecting articles older than {} days",
        config.feed_url, config.days_old
    );

    let composer = match config.openai.api_key.as_deref() {
        Some(api_key) => StatusComposer::with_adapter(Arc::new(OpenAiAdapter::new(api_key, config.openai.model.clone())?)),
        None => StatusComposer::template_only(),
    };
    let publisher = Arc::new(SharkeyPublisher::new(PUBLISH_TIMEOUT_SECONDS)?);
    let pipeline = PublishPipeline::new(config.pipeline_config(), composer, publisher);

    let source = RssFeedSource::new(config.feed_url.clone(), config.fetch_config())?;
    let result = match source.pull().await {
        Ok(items) => pipeline.run(items).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            info!(
                "Done: {} candidates, {} {}",
                report.candidates,
                report.published.len(),
                if report.dry_run { "simulated" } else { "published" }
            );
            Ok(())
        }
        Err(e) => {
            error!("Run aborted, posted log left unchanged: {}", e);
            Err(e.into())
        }
    }
}
