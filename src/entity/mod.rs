//! Alias-based entity tagging.
//!
//! The reference table maps text variants (aliases) to canonical entity
//! names; the tagger annotates each news item with the canonical names
//! whose aliases appear in its text.

pub mod table;
pub mod tagger;

pub use table::AliasTable;
pub use tagger::{tag_items, TagReport, ValidationPolicy};

// Module-level constants
pub const TARGET_ENTITY: &str = "entity";
