//! Per-item tagging against a built alias table.

use anyhow::{bail, Result};
use tracing::{debug, warn};

use super::table::AliasTable;
use super::TARGET_ENTITY;
use crate::item::NewsItem;

/// Longest display title synthesized from content.
const SYNTHESIZED_TITLE_CHARS: usize = 120;

/// What to do with an item that has neither title nor content.
///
/// Default is `Lenient`: the item is left untagged and counted, and the
/// run continues. `Strict` fails the whole run naming the offending
/// record, leaving previously written files untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    Strict,
    #[default]
    Lenient,
}

/// Counts reported by one tagging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
    pub tagged: usize,
    pub skipped: usize,
}

/// Tag every item in place with the canonical names its text mentions.
///
/// `origin` names the batch being tagged (usually the file name) and
/// appears in diagnostics. Re-running with the same table reproduces the
/// same `platforms_mentioned` exactly.
pub fn tag_items(
    items: &mut [NewsItem],
    table: &AliasTable,
    policy: ValidationPolicy,
    origin: &str,
) -> Result<TagReport> {
    let mut report = TagReport::default();

    for (index, item) in items.iter_mut().enumerate() {
        if !item.has_text() {
            match policy {
                ValidationPolicy::Strict => {
                    bail!("{origin}: record {index} has neither title nor content");
                }
                ValidationPolicy::Lenient => {
                    warn!(
                        target: TARGET_ENTITY,
                        "{origin}: record {index} has neither title nor content, skipping"
                    );
                    report.skipped += 1;
                    continue;
                }
            }
        }

        // Display fallback only; matching always runs over title+content.
        if item.title_text().is_none() {
            if let Some(content) = item.content_text() {
                item.title = Some(synthesize_title(content));
            }
        }

        let haystack = format!(
            "{} {}",
            item.title.as_deref().unwrap_or_default(),
            item.content.as_deref().unwrap_or_default()
        );
        item.platforms_mentioned = table.canonical_matches(&haystack);
        report.tagged += 1;
    }

    debug!(
        target: TARGET_ENTITY,
        "{origin}: tagged {} records, skipped {}",
        report.tagged,
        report.skipped
    );
    Ok(report)
}

fn synthesize_title(content: &str) -> String {
    let mut title: String = content.chars().take(SYNTHESIZED_TITLE_CHARS).collect();
    if content.chars().count() > SYNTHESIZED_TITLE_CHARS {
        title.push('…');
    }
    title
}
