use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One entry of the source feed, as handed over by a feed source.
///
/// Date fields are kept as raw text; turning them into an instant is the job
/// of [`crate::dates::extract_timestamp`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

impl FeedItem {
    pub fn link_or_empty(&self) -> &str {
        self.link.as_deref().unwrap_or("")
    }

    pub fn summary_or_empty(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

/// A feed item selected for possible publishing in the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub item: FeedItem,
    pub published_at: DateTime<Utc>,
    pub normalized_url: String,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "reblogging-script/1.0 (+https://dasnetzundich.de)".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReblogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Feed could not be read: {0}")]
    MalformedFeed(String),

    #[error("Posted log {} is corrupt: {reason}", path.display())]
    CorruptLog { path: PathBuf, reason: String },

    #[error("Text generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReblogError>;
