//! Run configuration.
//!
//! Values come from CLI flags, then the environment (optionally seeded from a
//! `.env` file), then built-in defaults. Nothing below this module reads the
//! process environment.

use crate::pipeline::{PipelineConfig, PublishTarget};
use crate::traits::Visibility;
use crate::types::{FetchConfig, ReblogError, Result};
use chrono::Duration;
use std::path::PathBuf;

pub const DEFAULT_FEED_URL: &str = "https://dasnetzundich.de/category/anleitung/feed/";
pub const DEFAULT_DAYS_OLD: i64 = 180;
pub const DEFAULT_POSTED_LOG: &str = "./posted_urls.json";
pub const DEFAULT_LLM_MODEL: &str = "gpt-5-mini";
pub const PUBLISH_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct SharkeyConfig {
    pub instance_url: Option<String>,
    pub token: Option<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReblogConfig {
    pub feed_url: String,
    pub days_old: i64,
    pub max_posts: Option<i64>,
    pub posted_log: PathBuf,
    pub dry_run: bool,
    pub sharkey: SharkeyConfig,
    pub openai: OpenAiConfig,
}

/// Values given on the command line; `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub feed_url: Option<String>,
    pub days_old: Option<i64>,
    pub max_posts: Option<i64>,
    pub posted_log: Option<PathBuf>,
    pub dry_run: bool,
}

impl ReblogConfig {
    /// Read from the process environment after loading `.env`, if any.
    pub fn from_env(overrides: CliOverrides) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(overrides: CliOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let days_old = match overrides.days_old {
            Some(days) => days,
            None => get("DAYS_OLD")
                .map(|v| parse_int("DAYS_OLD", &v))
                .transpose()?
                .unwrap_or(DEFAULT_DAYS_OLD),
        };
        if days_old < 0 || Duration::try_days(days_old).is_none() {
            return Err(ReblogError::InvalidConfig(format!("DAYS_OLD out of range: {}", days_old)));
        }

        let max_posts = match overrides.max_posts {
            Some(limit) => Some(limit),
            None => get("MAX_POSTS").map(|v| parse_int("MAX_POSTS", &v)).transpose()?,
        };

        let visibility = match get("SHARKEY_VISIBILITY") {
            Some(raw) => raw.parse::<Visibility>().map_err(ReblogError::InvalidConfig)?,
            None => Visibility::default(),
        };

        Ok(Self {
            feed_url: overrides
                .feed_url
                .or_else(|| get("FEED_URL"))
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            days_old,
            max_posts,
            posted_log: overrides
                .posted_log
                .or_else(|| get("POSTED_LOG_PATH").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTED_LOG)),
            dry_run: overrides.dry_run,
            sharkey: SharkeyConfig {
                instance_url: get("SHARKEY_INSTANCE_URL"),
                token: get("SHARKEY_TOKEN"),
                visibility,
            },
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            },
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_age: Duration::try_days(self.days_old).unwrap_or(Duration::MAX),
            batch_limit: self.max_posts,
            posted_log_path: self.posted_log.clone(),
            dry_run: self.dry_run,
            target: PublishTarget {
                instance_url: self.sharkey.instance_url.clone(),
                token: self.sharkey.token.clone(),
                visibility: self.sharkey.visibility,
            },
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|e| ReblogError::InvalidConfig(format!("{} must be an integer, got '{}': {}", key, value, e)))
}
