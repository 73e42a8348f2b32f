//! Tag every news batch file in the data directory with the canonical
//! entities it mentions, using the entity reference table.
//!
//! Files are loaded and tagged in memory first and only written once the
//! whole run has validated, so a strict-mode failure leaves every
//! previously written file untouched.

use anyhow::Result;
use clap::Parser;
use lazy_static::lazy_static;
use newsflow::config::Config;
use newsflow::entity::{tag_items, AliasTable};
use newsflow::item::NewsItem;
use newsflow::logging::configure_logging;
use newsflow::store::{Store, DIGEST_FILE};
use regex::Regex;
use std::path::PathBuf;
use tracing::{info, warn};

lazy_static! {
    static ref NEWS_FILE_RX: Regex = Regex::new(r"^news_.*\.json$").unwrap();
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding the news files and the reference table
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Fail the run on records with neither title nor content
    /// (default: skip them and continue)
    #[arg(long)]
    strict: bool,

    /// Path to the entity reference CSV
    #[arg(long)]
    entity_table: Option<PathBuf>,
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.strict, cli.entity_table);
    let store = Store::open(&config.data_dir)?;

    if !config.entity_table.exists() {
        warn!(
            "Entity reference table {} not found, nothing to do",
            config.entity_table.display()
        );
        return Ok(());
    }
    let table = AliasTable::from_csv_path(&config.entity_table)?;
    info!("Loaded {} alias pattern(s)", table.len());

    let news_files = store.matching_files(&NEWS_FILE_RX)?;
    if news_files.is_empty() {
        info!("No news files found in {}, nothing to do", config.data_dir.display());
        return Ok(());
    }

    // Phase 1: load and tag everything in memory.
    let mut tagged: Vec<(PathBuf, Vec<NewsItem>)> = Vec::new();
    let mut articles_tagged = 0;
    for path in news_files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if name == DIGEST_FILE {
            continue;
        }
        let mut items = match store.read_items(&path) {
            Ok(items) => items,
            Err(err) => {
                warn!("Skipping unreadable file {name}: {err:#}");
                continue;
            }
        };
        let report = tag_items(&mut items, &table, config.validation, &name)?;
        articles_tagged += report.tagged;
        tagged.push((path, items));
    }

    // Phase 2: write every file back atomically.
    let files_processed = tagged.len();
    for (path, items) in tagged {
        store.write_items(&path, &items)?;
    }

    info!("Completed: {files_processed} file(s), {articles_tagged} article(s) tagged");
    Ok(())
}
