// src/ingest/rss.rs
//! Streaming RSS item extraction.
//!
//! Walks the document with `quick_xml::Reader` and collects the first N
//! `<item>` elements wherever they sit (RSS 2.0 nests them in `<channel>`,
//! RSS 1.0/RDF puts them at the root). Only direct children of an item are
//! read; nested markup such as `<media:group>` is skipped.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::ingest::types::{FetchError, RawItem};

/// Parse up to `max_items` items, in document order.
pub fn parse_items(xml: &str, max_items: usize) -> Result<Vec<RawItem>, FetchError> {
    if max_items == 0 {
        return Ok(Vec::new());
    }

    let xml_clean = scrub_html_entities_for_xml(xml);
    // Fragments of one field are concatenated untrimmed; build() trims once.
    let mut reader = Reader::from_str(&xml_clean);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current: Option<ItemBuilder> = None;
    // Depth relative to the open <item>: 1 = direct child.
    let mut depth = 0usize;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                if current.is_some() {
                    depth += 1;
                    field = if depth == 1 {
                        Field::from_local_name(local.as_ref())
                    } else {
                        None
                    };
                } else if local.as_ref() == b"item" {
                    current = Some(ItemBuilder::default());
                    depth = 0;
                }
            }
            Ok(Event::Empty(e)) => {
                if current.is_none() && e.local_name().as_ref() == b"item" {
                    items.push(RawItem::default());
                    if items.len() >= max_items {
                        break;
                    }
                }
            }
            Ok(Event::End(e)) => {
                if current.is_some() {
                    if depth == 0 && e.local_name().as_ref() == b"item" {
                        if let Some(builder) = current.take() {
                            items.push(builder.build());
                        }
                        if items.len() >= max_items {
                            break;
                        }
                    } else {
                        depth = depth.saturating_sub(1);
                    }
                    field = None;
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    let text = match e.unescape() {
                        Ok(t) => t.into_owned(),
                        // HTML-only entity left over after the scrub
                        Err(_) => html_escape::decode_html_entities(&String::from_utf8_lossy(&e))
                            .into_owned(),
                    };
                    item.push(f, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FetchError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if items.is_empty() && !looks_like_feed(&xml_clean) {
        return Err(FetchError::Xml("document has no rss or rdf root".into()));
    }

    Ok(items)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
    DcDate,
    Description,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"pubDate" => Some(Field::PubDate),
            // dc:date in RSS 1.0
            b"date" => Some(Field::DcDate),
            b"description" => Some(Field::Description),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: String,
    link: String,
    pub_date: String,
    dc_date: String,
    description: String,
}

impl ItemBuilder {
    fn push(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::DcDate => &mut self.dc_date,
            Field::Description => &mut self.description,
        };
        slot.push_str(text);
    }

    fn build(self) -> RawItem {
        let published_raw = if self.pub_date.trim().is_empty() {
            self.dc_date
        } else {
            self.pub_date
        };
        RawItem {
            title: self.title.trim().to_string(),
            link: self.link.trim().to_string(),
            published_raw: published_raw.trim().to_string(),
            description_raw: self.description,
        }
    }
}

/// An empty `<channel>` is a valid feed; an HTML error page is not.
fn looks_like_feed(xml: &str) -> bool {
    let head: String = xml.chars().take(4096).collect::<String>().to_ascii_lowercase();
    head.contains("<rss") || head.contains("<rdf") || head.contains("<channel")
}

/// Replace HTML named entities that XML does not define.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ITEMS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Feed</title>
<item><title>First</title><link>https://a.test/1</link>
<pubDate>Wed, 01 Jan 2025 00:00:00 GMT</pubDate>
<description><![CDATA[<p>Hello.</p>]]></description></item>
<item><title>Second&nbsp;one</title></item>
</channel></rss>"#;

    #[test]
    fn reads_items_in_document_order() {
        let items = parse_items(TWO_ITEMS, 10).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].link, "https://a.test/1");
        assert_eq!(items[0].published_raw, "Wed, 01 Jan 2025 00:00:00 GMT");
        assert_eq!(items[0].description_raw, "<p>Hello.</p>");
        assert_eq!(items[1].title, "Second one");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let items = parse_items(TWO_ITEMS, 10).unwrap();
        assert_eq!(items[1].link, "");
        assert_eq!(items[1].published_raw, "");
        assert_eq!(items[1].description_raw, "");
    }

    #[test]
    fn stops_after_max_items() {
        let items = parse_items(TWO_ITEMS, 1).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
        assert!(parse_items(TWO_ITEMS, 0).unwrap().is_empty());
    }

    #[test]
    fn nested_title_does_not_override_item_title() {
        let xml = r#"<rss><channel><item><title>Outer</title>
<media:group><media:title>Inner</media:title></media:group></item></channel></rss>"#;
        let items = parse_items(xml, 5).unwrap();
        assert_eq!(items[0].title, "Outer");
    }

    #[test]
    fn html_page_is_not_a_feed() {
        let err = parse_items("<html><body>Not found</body></html>", 5).unwrap_err();
        assert!(matches!(err, FetchError::Xml(_)));
    }
}
