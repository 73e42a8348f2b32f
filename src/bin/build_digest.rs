//! Build the day-keyed company digest from the quarterly partition files.

use anyhow::{Context, Result};
use clap::Parser;
use lazy_static::lazy_static;
use newsflow::config::Config;
use newsflow::digest::build_digest;
use newsflow::logging::configure_logging;
use newsflow::store::Store;
use regex::Regex;
use std::path::PathBuf;
use tracing::info;

lazy_static! {
    static ref QUARTER_FILE_RX: Regex = Regex::new(r"^news_\d{4}_Q[1-4]\.json$").unwrap();
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding the quarterly partition files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, false, None);
    let store = Store::open(&config.data_dir)?;

    let quarter_files = store.matching_files(&QUARTER_FILE_RX)?;
    if quarter_files.is_empty() {
        info!("No quarterly files in {}, nothing to do", config.data_dir.display());
        return Ok(());
    }

    let items = store.read_batches(&quarter_files);
    let digest = build_digest(&items);

    let json = serde_json::to_string_pretty(&digest).context("failed to serialize digest")?;
    store.write_atomic(&store.digest_path(), json.as_bytes())?;

    info!(
        "Digest created from {} quarterly file(s) covering {} day(s)",
        quarter_files.len(),
        digest.len()
    );
    Ok(())
}
