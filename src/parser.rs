use crate::sanitize::sanitize;
use feed_rs::parser;
use tracing::{debug, warn};

/// One normalized, sanitized item lifted out of a feed payload. Feed-level
/// context (category, source, locale) is attached later by the pipeline.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub guid: Option<String>,
    pub link: String,
    pub title: String,
    pub description: String,
    /// Raw upstream date rendered as text; empty when the feed carried none.
    pub pub_date: String,
}

/// Parse an RSS 2.0 or Atom payload into normalized items. feed-rs folds
/// both shapes (`channel.item` and `feed.entry`, single or list) into one
/// entry model; anything it cannot make sense of yields an empty item list
/// rather than an error.
pub fn parse_items(content: &str) -> Vec<RawItem> {
    let feed = match parser::parse(content.as_bytes()) {
        Ok(feed) => feed,
        Err(e) => {
            warn!("Unparseable feed payload, treating as empty: {}", e);
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for entry in feed.entries {
        let guid = if entry.id.trim().is_empty() {
            None
        } else {
            Some(entry.id.trim().to_string())
        };

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let title = entry.title.map(|t| t.content).unwrap_or_default();

        // Description preference: summary, then full content body.
        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();

        let pub_date = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();

        items.push(RawItem {
            guid,
            link,
            title: sanitize(&title),
            description: sanitize(&description),
            pub_date,
        });
    }

    debug!("Parsed {} feed items", items.len());
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <item>
      <guid>tag-1</guid>
      <title>First &amp; foremost</title>
      <link>https://example.com/a</link>
      <description><![CDATA[<p>Some <b>bold</b> text</p>]]></description>
      <pubDate>Mon, 06 Sep 2021 12:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <entry>
    <id>urn:entry:1</id>
    <title>Atom entry</title>
    <link href="https://example.com/atom/1"/>
    <summary>An entry</summary>
    <updated>2021-09-06T12:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items() {
        let items = parse_items(RSS_SAMPLE);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.guid.as_deref(), Some("tag-1"));
        assert_eq!(item.link, "https://example.com/a");
        assert_eq!(item.title, "First & foremost");
        assert_eq!(item.description, "Some bold text");
        assert!(!item.pub_date.is_empty());
    }

    #[test]
    fn parses_atom_entries() {
        let items = parse_items(ATOM_SAMPLE);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.guid.as_deref(), Some("urn:entry:1"));
        assert_eq!(item.link, "https://example.com/atom/1");
        assert_eq!(item.description, "An entry");
    }

    #[test]
    fn garbage_payload_yields_no_items() {
        assert!(parse_items("this is not xml at all").is_empty());
        assert!(parse_items("<html><body>nope</body></html>").is_empty());
    }
}
