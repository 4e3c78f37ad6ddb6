//! Simulation driver configuration loader.

use std::path::Path;

use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Driver settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of agents, each running its own tree.
    pub agents: usize,
    /// Simulation steps to run before shutting down.
    pub ticks: u64,
    /// Wall-clock length of one step.
    pub tick_ms: u64,
    /// Tree source id under `trees/`.
    pub tree: String,
    /// Key set source id.
    pub keys: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agents: 4,
            ticks: 20,
            tick_ms: 100,
            tree: "guard".to_owned(),
            keys: "keys".to_owned(),
        }
    }
}

/// Loader for driver configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
