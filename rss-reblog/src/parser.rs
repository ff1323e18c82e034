use crate::types::{FeedItem, ReblogError, Result};
use feed_rs::parser;
use tracing::{debug, info};

/// Turns RSS/Atom/JSON Feed documents into feed items.
pub struct FeedParser;

impl FeedParser {
    pub fn parse_items(content: &str) -> Result<Vec<FeedItem>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| ReblogError::MalformedFeed(e.to_string()))?;

        let items: Vec<FeedItem> = feed.entries.into_iter().map(Self::parse_entry).collect();

        info!("Parsed feed with {} entries", items.len());
        Ok(items)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> FeedItem {
        let title = entry.title.map(|t| t.content);
        // Atom entries may list self/edit links ahead of the page itself.
        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone());

        // Prefer the summary; fall back to the full content body.
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        FeedItem {
            title,
            link,
            summary,
            published: entry.published.map(|dt| dt.to_rfc3339()),
            updated: entry.updated.map(|dt| dt.to_rfc3339()),
        }
    }
}
