//! Collapse a day's hourly finanzen shard files into one daily batch,
//! de-duplicated and sorted newest-first, then remove the shards.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use newsflow::config::Config;
use newsflow::identity::IdentityKey;
use newsflow::item::NewsItem;
use newsflow::logging::configure_logging;
use newsflow::partition::sort_newest_first;
use newsflow::store::Store;
use regex::Regex;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding the hourly shard files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Collection day to combine, defaults to today (UTC)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, false, None);
    let store = Store::open(&config.data_dir)?;

    let day = cli.date.unwrap_or_else(|| Utc::now().date_naive());
    let shard_rx = Regex::new(&format!(
        r"^finanzen_{}_.+\.json$",
        regex::escape(&day.format("%Y-%m-%d").to_string())
    ))?;
    let shards = store.matching_files(&shard_rx)?;
    if shards.is_empty() {
        info!("No hourly finanzen files to combine for {day}");
        return Ok(());
    }

    let mut seen: HashSet<IdentityKey> = HashSet::new();
    let mut combined: Vec<NewsItem> = Vec::new();
    for item in store.read_batches(&shards) {
        if seen.insert(IdentityKey::resolve(&item)) {
            combined.push(item);
        }
    }
    sort_newest_first(&mut combined);

    let out = store
        .data_dir()
        .join(format!("finanzen_{}.json", day.format("%Y-%m-%d")));
    store.write_items(&out, &combined)?;

    for shard in &shards {
        std::fs::remove_file(shard)
            .with_context(|| format!("failed to remove shard {}", shard.display()))?;
    }

    info!(
        "Wrote {} with {} item(s), removed {} hourly file(s)",
        out.display(),
        combined.len(),
        shards.len()
    );
    Ok(())
}
