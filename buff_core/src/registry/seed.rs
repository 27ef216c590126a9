//! Seed table loading

use super::BuffDefinition;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Container for seed definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTable {
    pub buffs: Vec<BuffDefinition>,
}

/// Parse seed definitions from a TOML string
pub fn parse_seed_table(content: &str) -> Result<Vec<BuffDefinition>, ConfigError> {
    let table: SeedTable = crate::config::parse_toml(content)?;
    Ok(table.buffs)
}

/// Built-in seed definitions
pub fn default_seed_definitions() -> Vec<BuffDefinition> {
    let toml = include_str!("../../config/seed_buffs.toml");
    parse_seed_table(toml).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Built-in seed table failed to parse");
        Vec::new()
    })
}
