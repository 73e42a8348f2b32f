//! Merge the day's collector batches into the master collection and
//! recompute the quarterly partition files.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use newsflow::config::Config;
use newsflow::logging::configure_logging;
use newsflow::merge::merge;
use newsflow::partition::write_quarterly_partitions;
use newsflow::store::Store;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding batches, the master file and partitions
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Collection day to merge, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, false, None);
    let store = Store::open(&config.data_dir)?;

    let day = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let batch_paths = store.daily_batch_paths(day)?;
    if batch_paths.is_empty() {
        info!("No daily batch JSON found for {day}, nothing to merge");
        return Ok(());
    }

    let batch = store.read_batches(&batch_paths);
    let mut master = store.load_master()?;
    let outcome = merge(&mut master, batch);

    if outcome.added > 0 {
        store.save_master(&master)?;
        info!("Appended {} new item(s) to the master file", outcome.added);
    } else {
        info!("No new items to append");
    }

    write_quarterly_partitions(&store, &master)?;
    Ok(())
}
