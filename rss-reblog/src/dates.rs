use crate::types::FeedItem;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Derive the canonical UTC instant of an item.
///
/// The published field is tried first, then the updated field. A field that
/// does not parse is skipped; `None` means the item cannot be dated.
pub fn extract_timestamp(item: &FeedItem) -> Option<DateTime<Utc>> {
    [item.published.as_deref(), item.updated.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|raw| {
            let parsed = parse_raw_date(raw);
            if parsed.is_none() {
                debug!("Ignoring unparseable date field: {:?}", raw);
            }
            parsed
        })
}

/// Parse one raw date value. Any embedded offset is folded into the UTC
/// instant; values without an offset are taken as UTC.
pub fn parse_raw_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
