use crate::types::{FetchConfig, ReblogError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// HTTP transport for the source feed.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the raw body of `url`. Unreachable hosts, error statuses and
    /// oversized bodies are transport errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| ReblogError::InvalidConfig(format!("invalid feed URL {}: {}", url, e)))?;
        let start_time = Instant::now();
        debug!("Fetching feed: {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ReblogError::Transport(format!("feed unreachable: {}", e)))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ReblogError::Transport(format!("feed responded with HTTP status {}", status.as_u16())));
        }

        let limit_bytes = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit_bytes {
                return Err(ReblogError::Transport(format!(
                    "feed too large: {} bytes exceeds {}MB",
                    content_length, self.config.max_feed_size_mb
                )));
            }
        }

        let content = response
            .text()
            .await
            .map_err(|e| ReblogError::Transport(format!("feed body unreadable: {}", e)))?;
        if content.len() > limit_bytes {
            return Err(ReblogError::Transport(format!(
                "feed too large: {} bytes exceeds {}MB",
                content.len(),
                self.config.max_feed_size_mb
            )));
        }

        info!(
            "Fetched feed: {} ({} bytes, {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}
