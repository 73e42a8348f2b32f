//! Deduplicating merge of collector batches into the master collection.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::identity::IdentityKey;
use crate::item::NewsItem;
use crate::TARGET_MERGE;

/// Counts reported by one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Append every not-yet-seen item from `batch` onto `master`.
///
/// The key index is seeded from the current master and extended as the
/// batch is scanned, so duplicates within the batch are caught the same
/// way as duplicates against the master. First-seen wins: a later item
/// with an already-recorded key is skipped, never merged into the
/// earlier one. Batch order is preserved and already-merged items are
/// never reordered, which makes the operation idempotent.
pub fn merge(master: &mut Vec<NewsItem>, batch: Vec<NewsItem>) -> MergeOutcome {
    let mut seen: HashSet<IdentityKey> = master.iter().map(IdentityKey::resolve).collect();
    let mut outcome = MergeOutcome::default();

    for item in batch {
        let key = IdentityKey::resolve(&item);
        if seen.insert(key) {
            master.push(item);
            outcome.added += 1;
        } else {
            debug!(
                target: TARGET_MERGE,
                "Skipping duplicate: {}",
                item.title_text().unwrap_or("<untitled>")
            );
            outcome.skipped += 1;
        }
    }

    info!(
        target: TARGET_MERGE,
        "Merged batch: {} added, {} skipped, master now {} items",
        outcome.added,
        outcome.skipped,
        master.len()
    );
    outcome
}
