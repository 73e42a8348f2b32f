//! Calendar-period views of the master collection.
//!
//! Partitions are derived data: every run rebuilds them in full from the
//! current master, so they can never drift from it no matter how many
//! runs happened in between. Items whose `published_at` does not resolve
//! stay in the master but appear in no partition.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::item::NewsItem;
use crate::store::Store;
use crate::timestamp::{published_datetime, published_day};
use crate::TARGET_STORE;

/// One calendar quarter, e.g. `2025_Q2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Quarter {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }

    pub fn file_name(&self) -> String {
        format!("news_{self}.json")
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_Q{}", self.year, self.quarter)
    }
}

/// Stable newest-first ordering by `published_at`; items without a
/// parseable timestamp keep their relative order at the tail.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by_key(|item| Reverse(published_datetime(item)));
}

/// Group items by the quarter their `published_at` resolves to.
pub fn partition_by_quarter(items: &[NewsItem]) -> BTreeMap<Quarter, Vec<NewsItem>> {
    let mut by_quarter: BTreeMap<Quarter, Vec<NewsItem>> = BTreeMap::new();
    for item in items {
        if let Some(day) = published_day(item) {
            by_quarter
                .entry(Quarter::from_date(day))
                .or_default()
                .push(item.clone());
        }
    }
    for bucket in by_quarter.values_mut() {
        sort_newest_first(bucket);
    }
    by_quarter
}

/// Group items by the day their `published_at` resolves to.
pub fn partition_by_day(items: &[NewsItem]) -> BTreeMap<NaiveDate, Vec<NewsItem>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<NewsItem>> = BTreeMap::new();
    for item in items {
        if let Some(day) = published_day(item) {
            by_day.entry(day).or_default().push(item.clone());
        }
    }
    by_day
}

/// Recompute every quarterly partition file from the master.
pub fn write_quarterly_partitions(store: &Store, master: &[NewsItem]) -> Result<()> {
    for (quarter, items) in partition_by_quarter(master) {
        let path = store.data_dir().join(quarter.file_name());
        store.write_items(&path, &items)?;
        info!(target: TARGET_STORE, "Wrote {} items to {}", items.len(), quarter.file_name());
    }
    Ok(())
}
