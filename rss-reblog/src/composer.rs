use crate::llm_adapter::{GenerationRequest, LlmAdapter};
use crate::types::Candidate;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::warn;

pub const TITLE_PLACEHOLDER: &str = "Ohne Titel";

/// Builds the outgoing text for one candidate.
pub struct StatusComposer {
    adapter: Option<Arc<dyn LlmAdapter>>,
}

impl StatusComposer {
    /// Composer that always uses the template.
    pub fn template_only() -> Self {
        Self { adapter: None }
    }

    pub fn with_adapter(adapter: Arc<dyn LlmAdapter>) -> Self {
        Self { adapter: Some(adapter) }
    }

    pub fn has_adapter(&self) -> bool {
        self.adapter.is_some()
    }

    /// Compose the status for `candidate`. Generation problems are never
    /// fatal; they fall back to [`fallback_status`].
    pub async fn compose(&self, candidate: &Candidate) -> String {
        let Some(adapter) = &self.adapter else {
            return fallback_status(candidate);
        };

        let request = generation_request(candidate);
        match adapter.generate_status(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => generated_status(candidate, text.trim()),
            Ok(_) => {
                warn!("{} returned no text, falling back to template", adapter.adapter_name());
                fallback_status(candidate)
            }
            Err(e) => {
                warn!("{} failed ({}), falling back to template", adapter.adapter_name(), e);
                fallback_status(candidate)
            }
        }
    }
}

fn generation_request(candidate: &Candidate) -> GenerationRequest {
    let item = &candidate.item;
    GenerationRequest {
        title: item.title.clone().unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        link: item.link_or_empty().to_string(),
        published: candidate.published_at.date_naive(),
        summary: clean_summary(item.summary_or_empty()),
    }
}

/// Deterministic template: title, link, cleaned summary, date suffix.
pub fn fallback_status(candidate: &Candidate) -> String {
    let item = &candidate.item;
    let title = item.title.as_deref().unwrap_or(TITLE_PLACEHOLDER).trim().to_string();
    let parts = [
        title,
        item.link_or_empty().to_string(),
        clean_summary(item.summary_or_empty()),
        date_suffix(candidate),
    ];
    join_parts(parts)
}

/// Generated text followed by the read-more line and the date suffix.
pub fn generated_status(candidate: &Candidate, generated: &str) -> String {
    let link = candidate.item.link_or_empty();
    let read_more = if link.is_empty() {
        String::new()
    } else {
        format!("Mehr lesen: {}", link)
    };
    join_parts([generated.to_string(), read_more, date_suffix(candidate)])
}

pub fn date_suffix(candidate: &Candidate) -> String {
    format!(
        "(Original veröffentlicht am {})",
        candidate.published_at.date_naive().format("%Y-%m-%d")
    )
}

/// Strip tags with a lenient pattern and collapse whitespace.
pub fn clean_summary(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static SPACE: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
    let space = SPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

    let without_tags = tag.replace_all(text, " ");
    space.replace_all(&without_tags, " ").trim().to_string()
}

fn join_parts<I: IntoIterator<Item = String>>(parts: I) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
