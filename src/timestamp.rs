//! Shared timestamp parsing for the partitioner and the digest builder.
//!
//! Collector output carries `published_at` in whatever shape the upstream
//! feed used: RFC 3339, naive ISO with or without a time, a bare date, or
//! RFC 2822 from RSS channels. Both period-deriving stages resolve the
//! field through [`parse_published`], so an item lands in a partition and
//! in the digest under the same day or in neither.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::item::NewsItem;

lazy_static! {
    static ref DATE_RX: Regex = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
}

/// Parse a loosely-formatted timestamp string.
///
/// Tries, in order: RFC 3339, naive ISO variants, a `YYYY-MM-DD`
/// substring anywhere in the string, and RFC 2822 as the flexible
/// fallback. Returns `None` when nothing matches; callers treat that as
/// "excluded from period-derived views", never as an error.
pub fn parse_published(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    // Timestamps like "2025-04-28 16:55 CET" still carry a usable date.
    if let Some(m) = DATE_RX.find(raw) {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d") {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc());
    }

    None
}

/// The calendar day an item was published, if resolvable.
pub fn published_day(item: &NewsItem) -> Option<NaiveDate> {
    item.published_at
        .as_deref()
        .and_then(parse_published)
        .map(|dt| dt.date())
}

/// The full timestamp an item was published, if resolvable.
pub fn published_datetime(item: &NewsItem) -> Option<NaiveDateTime> {
    item.published_at.as_deref().and_then(parse_published)
}
