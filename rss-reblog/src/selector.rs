use crate::dates::extract_timestamp;
use crate::normalize::normalize_url;
use crate::posted_log::PostedLog;
use crate::types::{Candidate, FeedItem};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Items dated at or before `cutoff`, oldest first.
///
/// Undatable items and items without a link are dropped; neither can be
/// aged or tracked.
pub fn select_aged<I>(items: I, cutoff: DateTime<Utc>) -> Vec<Candidate>
where
    I: IntoIterator<Item = FeedItem>,
{
    let mut aged: Vec<Candidate> = items
        .into_iter()
        .filter_map(|item| {
            let Some(published_at) = extract_timestamp(&item) else {
                debug!("Dropping undatable item: {:?}", item.title);
                return None;
            };
            if published_at > cutoff {
                return None;
            }
            let normalized_url = normalize_url(item.link_or_empty());
            if normalized_url.is_empty() {
                debug!("Dropping item without link: {:?}", item.title);
                return None;
            }
            Some(Candidate {
                item,
                published_at,
                normalized_url,
            })
        })
        .collect();

    aged.sort_by_key(|candidate| candidate.published_at);
    aged
}

/// Remove candidates whose link is already in the posted log, however long
/// ago it was posted.
pub fn exclude_posted(candidates: Vec<Candidate>, posted: &PostedLog) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let already = posted.contains(&candidate.normalized_url);
            if already {
                info!("Skipping already posted item: {}", candidate.item.link_or_empty());
            }
            !already
        })
        .collect()
}

/// Full selection: aged, dated, linked and not yet posted, oldest first.
pub fn select_candidates<I>(items: I, cutoff: DateTime<Utc>, posted: &PostedLog) -> Vec<Candidate>
where
    I: IntoIterator<Item = FeedItem>,
{
    exclude_posted(select_aged(items, cutoff), posted)
}
