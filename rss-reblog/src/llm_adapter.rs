use crate::types::{ReblogError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "Du schreibst kurze, sachliche deutsche Notizen für Sharkey/Misskey. \
Fasse den Inhalt eines Blogartikels freundlich zusammen, füge einen Hinweis \
auf das ursprüngliche Veröffentlichungsdatum hinzu und animiere zum Lesen.";

/// What an adapter gets to know about the item it writes for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub link: String,
    pub published: NaiveDate,
    pub summary: String,
}

impl GenerationRequest {
    fn user_prompt(&self) -> String {
        format!(
            "Titel: {}\nLink: {}\nVeröffentlicht am: {}\nZusammenfassung: {}",
            self.title, self.link, self.published, self.summary
        )
    }
}

/// Trait for LLM adapters that write the text of a re-post.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    fn adapter_name(&self) -> String;

    /// Generate the body of a status. `Ok(None)` means the model produced
    /// nothing usable; errors are [`ReblogError::GenerationUnavailable`].
    async fn generate_status(&self, request: &GenerationRequest) -> Result<Option<String>>;
}

/// Chat Completions adapter.
pub struct OpenAiAdapter {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiAdapter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: OPENAI_CHAT_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmAdapter for OpenAiAdapter {
    fn adapter_name(&self) -> String {
        format!("OpenAI ({})", self.model)
    }

    async fn generate_status(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let user_prompt = request.user_prompt();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.6,
        };

        debug!("Requesting status text from {} for {}", self.adapter_name(), request.link);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReblogError::GenerationUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReblogError::GenerationUnavailable(format!("OpenAI responded with HTTP {}", status)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReblogError::GenerationUnavailable(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());
        Ok(text)
    }
}

/// Adapter returning a fixed text, for local runs and tests.
pub struct MockLlmAdapter {
    name: String,
    text: Option<String>,
}

impl MockLlmAdapter {
    pub fn new(name: String) -> Self {
        Self { name, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[async_trait]
impl LlmAdapter for MockLlmAdapter {
    fn adapter_name(&self) -> String {
        format!("Mock LLM Adapter ({})", self.name)
    }

    async fn generate_status(&self, request: &GenerationRequest) -> Result<Option<String>> {
        Ok(Some(self.text.clone().unwrap_or_else(|| {
            format!("Aus dem Archiv: {}", request.title)
        })))
    }
}
