pub mod config;
pub mod digest;
pub mod entity;
pub mod identity;
pub mod item;
pub mod logging;
pub mod merge;
pub mod partition;
pub mod store;
pub mod timestamp;

pub const TARGET_MERGE: &str = "merge";
pub const TARGET_STORE: &str = "store";
pub const TARGET_DIGEST: &str = "digest";
