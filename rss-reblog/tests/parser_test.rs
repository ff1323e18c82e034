mod common;

use chrono::{TimeZone, Utc};
use rss_reblog::{extract_timestamp, FeedParser, ReblogError};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Das Netz und ich</title>
    <link>https://blog.example/</link>
    <description>Anleitungen</description>
    <item>
      <title>WLAN absichern</title>
      <link>https://blog.example/wlan-absichern/</link>
      <description><![CDATA[<p>Ein <b>sicheres</b> WLAN</p>]]></description>
      <pubDate>Tue, 02 Mar 2021 09:00:00 +0100</pubDate>
    </item>
    <item>
      <title>Ohne Datum</title>
      <link>https://blog.example/ohne-datum/</link>
    </item>
  </channel>
</rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Blog</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2022-05-01T10:00:00Z</updated>
  <entry>
    <title>Nur aktualisiert</title>
    <link href="https://atom.example/post"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2022-05-01T12:00:00+02:00</updated>
    <content type="html">&lt;p&gt;Inhalt&lt;/p&gt;</content>
  </entry>
</feed>"#;

#[test]
fn test_parses_rss_items() {
    common::init_tracing();
    let items = FeedParser::parse_items(RSS).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title.as_deref(), Some("WLAN absichern"));
    assert_eq!(items[0].link.as_deref(), Some("https://blog.example/wlan-absichern/"));
    assert!(items[0].summary.as_deref().unwrap().contains("sicheres"));
    assert_eq!(
        extract_timestamp(&items[0]),
        Some(Utc.with_ymd_and_hms(2021, 3, 2, 8, 0, 0).unwrap())
    );
    assert_eq!(extract_timestamp(&items[1]), None);
}

#[test]
fn test_parses_atom_updated_and_content() {
    let items = FeedParser::parse_items(ATOM).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].link.as_deref(), Some("https://atom.example/post"));
    assert!(items[0].summary.as_deref().unwrap().contains("Inhalt"));
    assert_eq!(
        extract_timestamp(&items[0]),
        Some(Utc.with_ymd_and_hms(2022, 5, 1, 10, 0, 0).unwrap())
    );
}

#[test]
fn test_alternate_link_is_preferred() {
    let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Blog</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2022-05-01T10:00:00Z</updated>
  <entry>
    <title>Mit Bearbeitungslink</title>
    <link rel="edit" href="https://atom.example/api/posts/7"/>
    <link rel="alternate" type="text/html" href="https://atom.example/post-7"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6b</id>
    <updated>2022-05-01T12:00:00Z</updated>
  </entry>
  <entry>
    <title>Nur Selbstlink</title>
    <link rel="self" href="https://atom.example/post-8.atom"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6c</id>
    <updated>2022-05-02T12:00:00Z</updated>
  </entry>
</feed>"#;

    let items = FeedParser::parse_items(atom).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].link.as_deref(), Some("https://atom.example/post-7"));
    assert_eq!(items[1].link.as_deref(), Some("https://atom.example/post-8.atom"));
}

#[test]
fn test_malformed_feed_is_an_error() {
    let result = FeedParser::parse_items("<html><body>not a feed</body></html>");
    assert!(matches!(result, Err(ReblogError::MalformedFeed(_))));
}
