//! Day-keyed digest of entity-relevant news.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::item::NewsItem;
use crate::timestamp::published_day;
use crate::TARGET_DIGEST;

pub const NO_COMPANY_STATUS: &str = "no company in the news";

/// One article listed under a digest day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestArticle {
    pub title: String,
    pub url: Option<String>,
    pub platforms_mentioned: Vec<String>,
}

/// What one day maps to in the digest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DigestEntry {
    Articles { articles: Vec<DigestArticle> },
    Status { status: String },
}

/// Build the day-keyed digest over all given items.
///
/// A day appears whenever any item resolves to it; it carries articles
/// only for items with a non-empty `platforms_mentioned`, in first-seen
/// order, and the fixed status string otherwise. Items with unparseable
/// timestamps contribute to no day at all.
pub fn build_digest(items: &[NewsItem]) -> BTreeMap<NaiveDate, DigestEntry> {
    let mut hits: BTreeMap<NaiveDate, Vec<DigestArticle>> = BTreeMap::new();
    let mut all_days: Vec<NaiveDate> = Vec::new();

    for item in items {
        let Some(day) = published_day(item) else {
            continue;
        };
        all_days.push(day);

        if !item.platforms_mentioned.is_empty() {
            hits.entry(day).or_default().push(DigestArticle {
                title: item.title_text().unwrap_or_default().to_string(),
                url: item.best_url().map(String::from),
                platforms_mentioned: item.platforms_mentioned.clone(),
            });
        }
    }

    let mut digest = BTreeMap::new();
    for day in all_days {
        if digest.contains_key(&day) {
            continue;
        }
        let entry = match hits.remove(&day) {
            Some(articles) => DigestEntry::Articles { articles },
            None => DigestEntry::Status {
                status: NO_COMPANY_STATUS.to_string(),
            },
        };
        digest.insert(day, entry);
    }

    info!(target: TARGET_DIGEST, "Digest covers {} day(s)", digest.len());
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, published_at: Option<&str>, platforms: &[&str]) -> NewsItem {
        NewsItem {
            title: Some(title.to_string()),
            url: Some(format!("https://news.example/{title}")),
            published_at: published_at.map(String::from),
            platforms_mentioned: platforms.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn every_resolvable_day_appears() {
        let items = vec![
            item("a", Some("2025-04-15T10:00:00"), &["Acme Lending"]),
            item("b", Some("2025-06-02"), &[]),
            item("c", Some("no date here at all"), &["Acme Lending"]),
        ];
        let digest = build_digest(&items);
        assert_eq!(digest.len(), 2);
        assert!(digest.contains_key(&day(2025, 4, 15)));
        assert!(digest.contains_key(&day(2025, 6, 2)));
    }

    #[test]
    fn day_without_hits_gets_status_entry() {
        let items = vec![item("quiet", Some("2025-06-02"), &[])];
        let digest = build_digest(&items);
        assert_eq!(
            digest[&day(2025, 6, 2)],
            DigestEntry::Status {
                status: NO_COMPANY_STATUS.to_string()
            }
        );
    }

    #[test]
    fn hits_keep_first_seen_order() {
        let items = vec![
            item("later", Some("2025-06-02 18:00:00"), &["Borrow Bank"]),
            item("earlier", Some("2025-06-02 09:00:00"), &["Acme Lending"]),
        ];
        let digest = build_digest(&items);
        let DigestEntry::Articles { articles } = &digest[&day(2025, 6, 2)] else {
            panic!("expected articles");
        };
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["later", "earlier"]);
    }

    #[test]
    fn url_is_null_when_item_has_none() {
        let mut no_url = item("bare", Some("2025-06-02"), &["Acme Lending"]);
        no_url.url = None;
        let digest = build_digest(&[no_url]);
        let DigestEntry::Articles { articles } = &digest[&day(2025, 6, 2)] else {
            panic!("expected articles");
        };
        assert_eq!(articles[0].url, None);

        let value = serde_json::to_value(&articles[0]).unwrap();
        assert!(value["url"].is_null());
    }

    #[test]
    fn serializes_day_keys_and_status_shape() {
        let items = vec![
            item("a", Some("2025-04-15"), &["Acme Lending"]),
            item("b", Some("2025-06-02"), &[]),
        ];
        let digest = build_digest(&items);
        let value = serde_json::to_value(&digest).unwrap();
        assert!(value["2025-04-15"]["articles"].is_array());
        assert_eq!(value["2025-06-02"]["status"], NO_COMPANY_STATUS);
    }
}
