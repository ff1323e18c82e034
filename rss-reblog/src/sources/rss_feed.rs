use crate::traits::FeedSource;
use crate::types::{FeedItem, FetchConfig, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Feed source reading a single RSS/Atom URL.
pub struct RssFeedSource {
    pub url: String,
    fetcher: Fetcher,
}

impl RssFeedSource {
    pub fn new(url: String, fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            url,
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_name(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.domain().map(|domain| format!("RSS Feed ({})", domain)))
            .unwrap_or_else(|| "RSS Feed".to_string())
    }

    async fn pull(&self) -> Result<Vec<FeedItem>> {
        info!("Loading feed {}", self.url);

        let content = self.fetcher.fetch(&self.url).await?;
        let items = FeedParser::parse_items(&content)?;

        info!("Pulled {} items from {}", items.len(), self.source_name());
        Ok(items)
    }
}
