//! Run configuration shared by the stage binaries.

use std::env;
use std::path::PathBuf;

use crate::entity::ValidationPolicy;

pub const DATA_DIR_ENV: &str = "NEWSFLOW_DATA_DIR";
pub const STRICT_VALIDATION_ENV: &str = "NEWSFLOW_STRICT_VALIDATION";
pub const ENTITY_TABLE_ENV: &str = "NEWSFLOW_ENTITY_TABLE";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ENTITY_TABLE: &str =
    "Master_Entities_Table - Originator_Platforms_Funds_and_Competitors.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub validation: ValidationPolicy,
    pub entity_table: PathBuf,
}

impl Config {
    /// Resolve configuration from CLI overrides with environment
    /// fallbacks. Precedence: flag, then env var, then default.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        strict: bool,
        entity_table: Option<PathBuf>,
    ) -> Self {
        let data_dir = data_dir
            .or_else(|| env::var(DATA_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let validation = if strict || env_flag(STRICT_VALIDATION_ENV) {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        };

        let entity_table = entity_table
            .or_else(|| env::var(ENTITY_TABLE_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join(DEFAULT_ENTITY_TABLE));

        Config {
            data_dir,
            validation,
            entity_table,
        }
    }
}

fn env_flag(var: &str) -> bool {
    matches!(
        env::var(var).unwrap_or_default().trim().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
