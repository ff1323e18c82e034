use crate::dates::parse_raw_date;
use crate::normalize::normalize_url;
use crate::types::{ReblogError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// On-disk shape of one posted-log record.
#[derive(Debug, Clone, Serialize)]
pub struct PostedRecord {
    pub url: String,
    pub posted_at: DateTime<Utc>,
}

/// Durable mapping from normalized URL to the instant it was posted.
///
/// Keys are always normalized, so lookups are insensitive to the spelling of
/// the link that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostedLog {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl PostedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the log at `path`.
    ///
    /// A missing file is an empty log. A file that is not a JSON list is a
    /// [`ReblogError::CorruptLog`]; individual records without a usable URL or
    /// timestamp are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No posted log at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<Value> = serde_json::from_str(&content).map_err(|e| ReblogError::CorruptLog {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut log = Self::new();
        let mut skipped = 0usize;
        for record in &records {
            match parse_record(record) {
                Some((url, posted_at)) => log.insert_latest(url, posted_at),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} unusable records in {}", skipped, path.display());
        }
        info!("Loaded {} posted URLs from {}", log.len(), path.display());
        Ok(log)
    }

    /// Replace the file at `path` with the full log, sorted by URL.
    ///
    /// The JSON is written to a sibling temporary file first and renamed over
    /// the target, so readers only ever see the old or the new content.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload: Vec<PostedRecord> = self
            .entries
            .iter()
            .map(|(url, posted_at)| PostedRecord {
                url: url.clone(),
                posted_at: *posted_at,
            })
            .collect();
        let json = serde_json::to_string_pretty(&payload)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = Path::new(&tmp_name);
        {
            let mut file = fs::File::create(tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(tmp, path)?;

        info!("Saved {} posted URLs to {}", self.len(), path.display());
        Ok(())
    }

    /// Whether `url` (in any spelling) has been posted.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(&normalize_url(url))
    }

    /// Record `url` as posted at `posted_at`, replacing any earlier entry.
    pub fn record(&mut self, url: &str, posted_at: DateTime<Utc>) {
        let key = normalize_url(url);
        if key.is_empty() {
            return;
        }
        self.entries.insert(key, posted_at);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_latest(&mut self, url: String, posted_at: DateTime<Utc>) {
        let slot = self.entries.entry(url).or_insert(posted_at);
        if posted_at > *slot {
            *slot = posted_at;
        }
    }
}

impl FromIterator<(String, DateTime<Utc>)> for PostedLog {
    fn from_iter<I: IntoIterator<Item = (String, DateTime<Utc>)>>(iter: I) -> Self {
        let mut log = Self::new();
        for (url, posted_at) in iter {
            log.record(&url, posted_at);
        }
        log
    }
}

fn parse_record(record: &Value) -> Option<(String, DateTime<Utc>)> {
    let url = record.get("url")?.as_str()?;
    let posted_at = record.get("posted_at")?.as_str()?;
    if url.trim().is_empty() || posted_at.trim().is_empty() {
        return None;
    }

    let normalized = normalize_url(url);
    if normalized.is_empty() {
        return None;
    }
    // Same tolerance as feed dates: space separator, no offset, or a bare date.
    Some((normalized, parse_raw_date(posted_at)?))
}
