use crate::types::{FeedItem, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Trait for sources that supply the feed items of one run.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch and parse the current items of the source
    async fn pull(&self) -> Result<Vec<FeedItem>>;
}

/// Note visibility levels understood by Misskey-compatible instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Home,
    Followers,
    Specified,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Home => "home",
            Visibility::Followers => "followers",
            Visibility::Specified => "specified",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "home" => Ok(Visibility::Home),
            "followers" => Ok(Visibility::Followers),
            "specified" => Ok(Visibility::Specified),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

/// Everything the publish collaborator needs to create one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub instance_url: String,
    pub token: String,
    pub visibility: Visibility,
    pub text: String,
}

/// Trait for endpoints that accept a composed status. Must either publish
/// or return an error.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn publisher_name(&self) -> String;

    async fn publish(&self, note: &NoteRequest) -> Result<()>;
}
