use crate::composer::StatusComposer;
use crate::posted_log::PostedLog;
use crate::selector::select_candidates;
use crate::traits::{NoteRequest, Publisher, Visibility};
use crate::types::{Candidate, FeedItem, ReblogError, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Where and how notes are published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishTarget {
    pub instance_url: Option<String>,
    pub token: Option<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Items younger than this are left alone.
    pub max_age: Duration,
    /// Maximum number of publishes per run; unset or <= 0 means one.
    pub batch_limit: Option<i64>,
    pub posted_log_path: PathBuf,
    pub dry_run: bool,
    pub target: PublishTarget,
}

impl PipelineConfig {
    pub fn effective_batch_limit(&self) -> usize {
        match self.batch_limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(usize::MAX),
            _ => 1,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.max_age).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Candidates left after date filtering and dedup, before truncation.
    pub candidates: usize,
    /// Normalized URLs published (or simulated) in order.
    pub published: Vec<String>,
    pub dry_run: bool,
    pub log_saved: bool,
}

/// Selection -> composition -> publish -> log update, for one bounded batch.
pub struct PublishPipeline {
    config: PipelineConfig,
    composer: StatusComposer,
    publisher: Arc<dyn Publisher>,
}

impl PublishPipeline {
    pub fn new(config: PipelineConfig, composer: StatusComposer, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            config,
            composer,
            publisher,
        }
    }

    pub async fn run(&self, items: Vec<FeedItem>) -> Result<RunReport> {
        self.run_at(items, Utc::now()).await
    }

    /// Run against `items` with `now` as the reference instant for the cutoff.
    ///
    /// The posted log is written once, after every publish of the batch has
    /// succeeded; any error leaves the file untouched.
    pub async fn run_at(&self, items: Vec<FeedItem>, now: DateTime<Utc>) -> Result<RunReport> {
        let cutoff = self.config.cutoff(now);
        info!(
            "Selecting {} feed items published on or before {}",
            items.len(),
            cutoff.to_rfc3339()
        );

        let mut posted = PostedLog::load(&self.config.posted_log_path)?;
        let mut candidates = select_candidates(items, cutoff, &posted);

        let mut report = RunReport {
            candidates: candidates.len(),
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        if candidates.is_empty() {
            info!("No matching items found");
            return Ok(report);
        }

        let limit = self.config.effective_batch_limit();
        candidates.truncate(limit);
        debug!("Processing {} of {} candidates", candidates.len(), report.candidates);

        let credentials = if self.config.dry_run {
            None
        } else {
            Some(self.credentials()?)
        };

        for candidate in &candidates {
            let text = self.composer.compose(candidate).await;

            match &credentials {
                None => print_dry_run(&text),
                Some((instance_url, token)) => {
                    self.publish(candidate, instance_url, token, text).await?;
                    posted.record(&candidate.normalized_url, Utc::now());
                }
            }
            report.published.push(candidate.normalized_url.clone());
        }

        if !self.config.dry_run {
            posted.save(&self.config.posted_log_path)?;
            report.log_saved = true;
        }

        info!(
            "Run finished: {} of {} candidates {}",
            report.published.len(),
            report.candidates,
            if report.dry_run { "simulated" } else { "published" }
        );
        Ok(report)
    }

    fn credentials(&self) -> Result<(String, String)> {
        let target = &self.config.target;
        let instance_url = target.instance_url.as_deref().map(str::trim).unwrap_or("");
        let token = target.token.as_deref().map(str::trim).unwrap_or("");
        if instance_url.is_empty() || token.is_empty() {
            return Err(ReblogError::MissingCredential(
                "SHARKEY_INSTANCE_URL and SHARKEY_TOKEN must be set to publish".to_string(),
            ));
        }
        Ok((instance_url.to_string(), token.to_string()))
    }

    async fn publish(&self, candidate: &Candidate, instance_url: &str, token: &str, text: String) -> Result<()> {
        let note = NoteRequest {
            instance_url: instance_url.to_string(),
            token: token.to_string(),
            visibility: self.config.target.visibility,
            text,
        };
        debug!(
            "Publishing {} via {}",
            candidate.normalized_url,
            self.publisher.publisher_name()
        );
        self.publisher.publish(&note).await
    }
}

/// The framed text printed instead of publishing in dry-run mode.
pub fn dry_run_frame(text: &str) -> String {
    format!("[DRY RUN] Würde posten:\n---\n{}\n---", text)
}

fn print_dry_run(text: &str) {
    println!("{}", dry_run_frame(text));
}
