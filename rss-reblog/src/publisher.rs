use crate::traits::{NoteRequest, Publisher, Visibility};
use crate::types::{ReblogError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Publishes notes through the `notes/create` API of a Sharkey/Misskey instance.
pub struct SharkeyPublisher {
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CreateNote<'a> {
    i: &'a str,
    text: &'a str,
    visibility: Visibility,
}

impl SharkeyPublisher {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client })
    }

    pub fn endpoint(instance_url: &str) -> String {
        format!("{}/api/notes/create", instance_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Publisher for SharkeyPublisher {
    fn publisher_name(&self) -> String {
        "Sharkey".to_string()
    }

    async fn publish(&self, note: &NoteRequest) -> Result<()> {
        if note.instance_url.trim().is_empty() || note.token.trim().is_empty() {
            return Err(ReblogError::MissingCredential(
                "SHARKEY_INSTANCE_URL and SHARKEY_TOKEN must be set to publish".to_string(),
            ));
        }

        let endpoint = Self::endpoint(&note.instance_url);
        debug!("Creating note at {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&CreateNote {
                i: &note.token,
                text: &note.text,
                visibility: note.visibility,
            })
            .send()
            .await
            .map_err(|e| ReblogError::Transport(format!("Sharkey unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReblogError::Transport(format!("Sharkey responded {}: {}", status, body)));
        }

        info!("Posted to Sharkey: status {}", status.as_u16());
        Ok(())
    }
}
