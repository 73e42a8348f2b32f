//! Alias table construction from the entity reference CSV.
//!
//! The reference table has one canonical-name column (the first column
//! whose header does not start with "alias", case-insensitively) and any
//! number of alias columns (headers starting with "alias"). Every
//! non-empty alias cell maps that alias to the row's canonical name.
//!
//! Construction is a pure build step: patterns are compiled once and the
//! table is immutable afterwards, so the same table tags any number of
//! batches identically.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::TARGET_ENTITY;

struct AliasPattern {
    canonical: String,
    pattern: Regex,
}

/// Mapping from recognized text variants to canonical entity names,
/// with one compiled whole-word, case-insensitive pattern per alias.
pub struct AliasTable {
    patterns: Vec<AliasPattern>,
}

impl AliasTable {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open entity table {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to build alias table from {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv.headers().context("entity table has no header row")?.clone();

        let canonical_col = headers
            .iter()
            .position(|h| !h.to_lowercase().starts_with("alias"));
        let Some(canonical_col) = canonical_col else {
            bail!("entity table has no canonical-name column");
        };
        let alias_cols: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.to_lowercase().starts_with("alias"))
            .map(|(i, _)| i)
            .collect();
        if alias_cols.is_empty() {
            bail!("entity table has no alias columns");
        }

        // Later rows win when the same alias appears twice, and the map
        // also collapses duplicate cells to one compiled pattern.
        let mut alias_to_canonical: HashMap<String, String> = HashMap::new();
        for record in csv.records() {
            let record = record.context("failed to read entity table row")?;
            let Some(canonical) = record.get(canonical_col).map(str::trim) else {
                continue;
            };
            if canonical.is_empty() {
                continue;
            }
            for &col in &alias_cols {
                let alias = record.get(col).map(str::trim).unwrap_or_default();
                if alias.is_empty() {
                    continue;
                }
                alias_to_canonical.insert(alias.to_lowercase(), canonical.to_string());
            }
        }

        let mut patterns = Vec::with_capacity(alias_to_canonical.len());
        for (alias, canonical) in alias_to_canonical {
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&alias)))
                .with_context(|| format!("failed to compile pattern for alias {alias:?}"))?;
            patterns.push(AliasPattern { canonical, pattern });
        }
        debug!(target: TARGET_ENTITY, "Built alias table with {} patterns", patterns.len());

        Ok(AliasTable { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Canonical names with at least one alias matching `haystack`,
    /// sorted and de-duplicated.
    pub fn canonical_matches(&self, haystack: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .patterns
            .iter()
            .filter(|p| p.pattern.is_match(haystack))
            .map(|p| p.canonical.clone())
            .collect();
        matches.sort();
        matches.dedup();
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> AliasTable {
        AliasTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn builds_from_canonical_and_alias_columns() {
        let t = table(
            "Platform,Alias 1,Alias 2\n\
             Acme Lending,acme,acme lending\n\
             Borrow Bank,borrowbank,\n",
        );
        assert_eq!(t.len(), 3);
        assert_eq!(t.canonical_matches("Acme raises $5M"), vec!["Acme Lending"]);
        assert_eq!(t.canonical_matches("BorrowBank expands"), vec!["Borrow Bank"]);
    }

    #[test]
    fn matching_is_whole_word() {
        let t = table("Platform,Alias 1\nAcme Lending,acme\n");
        assert_eq!(t.canonical_matches("Acme raises $5M"), vec!["Acme Lending"]);
        assert!(t.canonical_matches("pharmacmetics reports earnings").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = table("Platform,Alias 1\nAcme Lending,AcMe\n");
        assert_eq!(t.canonical_matches("ACME and acme"), vec!["Acme Lending"]);
    }

    #[test]
    fn multiple_aliases_tag_one_canonical_once() {
        let t = table("Platform,Alias 1,Alias 2\nAcme Lending,acme,acme lending\n");
        let matched = t.canonical_matches("Acme Lending, known as acme");
        assert_eq!(matched, vec!["Acme Lending"]);
    }

    #[test]
    fn blank_alias_cells_are_dropped() {
        let t = table("Platform,Alias 1,Alias 2\nAcme Lending,  ,acme\n");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn alias_with_regex_metacharacters_is_escaped() {
        let t = table("Platform,Alias 1\nAcme Lending,acme.com\n");
        assert_eq!(t.canonical_matches("Visit acme.com today"), vec!["Acme Lending"]);
        assert!(t.canonical_matches("acmeXcom reports").is_empty());
    }

    #[test]
    fn canonical_column_is_first_non_alias_header() {
        let t = table("Alias 1,Name,Alias 2\nacme,Acme Lending,acme lending\n");
        assert_eq!(t.canonical_matches("acme"), vec!["Acme Lending"]);
    }

    #[test]
    fn missing_alias_columns_is_an_error() {
        assert!(AliasTable::from_reader("Name,Sector\nAcme,Fintech\n".as_bytes()).is_err());
    }
}
