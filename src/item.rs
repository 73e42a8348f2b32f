//! The news-item record shared by every pipeline stage.
//!
//! Collectors produce loosely-structured JSON objects; fields they never
//! set stay `None` so that absence and empty-string are never conflated.
//! Fields this crate does not model are preserved verbatim through the
//! flattened `extra` map, so rewriting a batch file never drops collector
//! metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One reported article or event, as collected upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Canonical entity names mentioned by this item. Always sorted and
    /// de-duplicated; always present once the item has been tagged.
    #[serde(default)]
    pub platforms_mentioned: Vec<String>,
    /// Collector-specific fields we carry through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewsItem {
    /// The canonical article address, preferring `url` over `link`.
    pub fn best_url(&self) -> Option<&str> {
        self.url.as_deref().or(self.link.as_deref())
    }

    /// Title text, if present and not just whitespace.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Content text, if present and not just whitespace.
    pub fn content_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Whether the item carries any usable text at all.
    pub fn has_text(&self) -> bool {
        self.title_text().is_some() || self.content_text().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_title_are_distinguished() {
        let absent = NewsItem::default();
        assert!(absent.title.is_none());
        assert!(absent.title_text().is_none());

        let empty = NewsItem {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(empty.title.is_some());
        assert!(empty.title_text().is_none());
    }

    #[test]
    fn extra_fields_round_trip() {
        let raw = r#"{"title":"Zäsur am Markt","keywords":["credit","loan"],"rank":3}"#;
        let item: NewsItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.title.as_deref(), Some("Zäsur am Markt"));
        assert_eq!(item.extra.get("rank"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["keywords"], serde_json::json!(["credit", "loan"]));
        assert_eq!(back["title"], "Zäsur am Markt");
    }

    #[test]
    fn best_url_prefers_url_over_link() {
        let item = NewsItem {
            url: Some("https://a.example/1".to_string()),
            link: Some("https://b.example/1".to_string()),
            ..Default::default()
        };
        assert_eq!(item.best_url(), Some("https://a.example/1"));

        let link_only = NewsItem {
            link: Some("https://b.example/1".to_string()),
            ..Default::default()
        };
        assert_eq!(link_only.best_url(), Some("https://b.example/1"));
    }
}
