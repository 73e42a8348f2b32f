//! File-backed persistence for the master collection and derived views.
//!
//! The data directory holds the append-only master (`all_news.json`),
//! the daily batch files collectors drop in, the recomputed quarterly
//! partition files, and the digest. Every write goes through a temp file
//! in the same directory followed by a rename, so a crash mid-write
//! never leaves a truncated file behind.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::item::NewsItem;
use crate::TARGET_STORE;

pub const MASTER_FILE: &str = "all_news.json";
pub const DIGEST_FILE: &str = "news_filtered_for_companies_of_interest.json";

pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
        Ok(Store { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn master_path(&self) -> PathBuf {
        self.data_dir.join(MASTER_FILE)
    }

    pub fn digest_path(&self) -> PathBuf {
        self.data_dir.join(DIGEST_FILE)
    }

    /// Load the master collection, or start fresh if no master exists yet.
    pub fn load_master(&self) -> Result<Vec<NewsItem>> {
        let path = self.master_path();
        if !path.exists() {
            info!(target: TARGET_STORE, "No master file yet at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        self.read_items(&path)
    }

    /// Persist the full master collection atomically.
    pub fn save_master(&self, items: &[NewsItem]) -> Result<()> {
        self.write_items(&self.master_path(), items)
    }

    /// Read one JSON array of news items.
    pub fn read_items(&self, path: &Path) -> Result<Vec<NewsItem>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let items: Vec<NewsItem> = serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        Ok(items)
    }

    /// Write a JSON array of news items atomically (temp file + rename).
    pub fn write_items(&self, path: &Path, items: &[NewsItem]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)
            .with_context(|| format!("failed to serialize items for {}", path.display()))?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Atomic replace of `path` with `bytes`. The temp file lives in the
    /// same directory so the final rename stays on one filesystem.
    pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = path.parent().unwrap_or(&self.data_dir);
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(bytes)
            .with_context(|| format!("failed to write temp file for {}", path.display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("failed to sync temp file for {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!(target: TARGET_STORE, "Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Collect the batch files one collection day produced:
    /// `news_YYYY-MM-DD.json` and `finanzen_YYYY-MM-DD.json`.
    pub fn daily_batch_paths(&self, day: NaiveDate) -> Result<Vec<PathBuf>> {
        let names = [
            format!("news_{}.json", day.format("%Y-%m-%d")),
            format!("finanzen_{}.json", day.format("%Y-%m-%d")),
        ];
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| names.iter().any(|want| want == n))
            })
            .collect())
    }

    /// Read every file in `paths`, skipping files that fail to parse.
    ///
    /// One collector writing garbage must not block the records the
    /// other collectors produced, so a malformed file is logged and
    /// dropped rather than propagated.
    pub fn read_batches(&self, paths: &[PathBuf]) -> Vec<NewsItem> {
        let mut items = Vec::new();
        for path in paths {
            match self.read_items(path) {
                Ok(mut batch) => {
                    debug!(target: TARGET_STORE, "Loaded {} items from {}", batch.len(), path.display());
                    items.append(&mut batch);
                }
                Err(err) => {
                    warn!(target: TARGET_STORE, "Skipping unreadable batch {}: {:#}", path.display(), err);
                }
            }
        }
        items
    }

    /// All regular files directly inside the data directory, sorted by
    /// file name for deterministic processing order.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.data_dir)
            .with_context(|| format!("failed to list {}", self.data_dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Files whose names match `pattern`, sorted by name.
    pub fn matching_files(&self, pattern: &regex::Regex) -> Result<Vec<PathBuf>> {
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| pattern.is_match(n))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: &str) -> NewsItem {
        NewsItem {
            id: Some(id.to_string()),
            title: Some(format!("item {id}")),
            ..Default::default()
        }
    }

    #[test]
    fn missing_master_loads_empty() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.load_master().unwrap().is_empty());
    }

    #[test]
    fn master_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let items = vec![sample("1"), sample("2")];
        store.save_master(&items).unwrap();
        assert_eq!(store.load_master().unwrap(), items);
    }

    #[test]
    fn save_replaces_not_appends() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.save_master(&[sample("1"), sample("2")]).unwrap();
        store.save_master(&[sample("3")]).unwrap();
        let loaded = store.load_master().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_deref(), Some("3"));
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.save_master(&[sample("1")]).unwrap();
        let names: Vec<String> = store
            .list_files()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        assert_eq!(names, vec![MASTER_FILE.to_string()]);
    }

    #[test]
    fn malformed_batch_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let good = dir.path().join("news_2025-05-09.json");
        let bad = dir.path().join("finanzen_2025-05-09.json");
        store.write_items(&good, &[sample("1")]).unwrap();
        fs::write(&bad, "{ not json").unwrap();

        let items = store.read_batches(&[good, bad]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn daily_batch_paths_finds_both_collectors() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 5, 9).unwrap();
        store
            .write_items(&dir.path().join("news_2025-05-09.json"), &[sample("1")])
            .unwrap();
        store
            .write_items(&dir.path().join("finanzen_2025-05-09.json"), &[sample("2")])
            .unwrap();
        store
            .write_items(&dir.path().join("news_2025-05-08.json"), &[sample("3")])
            .unwrap();

        let paths = store.daily_batch_paths(day).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn non_ascii_survives_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let item = NewsItem {
            title: Some("Übernahme der Crédit-Plattform".to_string()),
            ..Default::default()
        };
        store.save_master(std::slice::from_ref(&item)).unwrap();
        let text = fs::read_to_string(store.master_path()).unwrap();
        assert!(text.contains("Übernahme der Crédit-Plattform"));
    }
}
