//! Driver configuration: `config.toml` overridden by environment variables.

use std::env;
use std::path::PathBuf;

use tree_content::{ContentFactory, LoadResult, SimConfig};

/// Everything the driver needs before it loads content.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub sim: SimConfig,
}

impl RunConfig {
    /// Construct configuration from the data directory and process
    /// environment variables.
    ///
    /// Environment variables:
    /// - `TREE_SIM_DATA_DIR` - Directory holding `config.toml`, key sets and trees (default: `data`)
    /// - `TREE_SIM_AGENTS` - Number of agents (default: from `config.toml`)
    /// - `TREE_SIM_TICKS` - Steps to simulate
    /// - `TREE_SIM_TICK_MS` - Milliseconds per step
    /// - `TREE_SIM_TREE` - Tree source id under `trees/`
    /// - `TREE_SIM_LOG_DIR` - Also write logs to `tree-sim.log` in this directory
    pub fn from_env() -> LoadResult<Self> {
        let data_dir = env::var("TREE_SIM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let factory = ContentFactory::new(&data_dir);
        let mut sim = if factory.data_dir().join("config.toml").is_file() {
            factory.load_config()?
        } else {
            SimConfig::default()
        };
        apply_overrides(&mut sim);

        Ok(Self {
            data_dir,
            log_dir: env::var("TREE_SIM_LOG_DIR").ok().map(PathBuf::from),
            sim,
        })
    }
}

fn apply_overrides(sim: &mut SimConfig) {
    if let Some(agents) = read_env::<usize>("TREE_SIM_AGENTS") {
        sim.agents = agents.max(1);
    }
    if let Some(ticks) = read_env::<u64>("TREE_SIM_TICKS") {
        sim.ticks = ticks;
    }
    if let Some(tick_ms) = read_env::<u64>("TREE_SIM_TICK_MS") {
        sim.tick_ms = tick_ms;
    }
    if let Ok(tree) = env::var("TREE_SIM_TREE") {
        sim.tree = tree;
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
