//! Simulation driver entry point.
//!
//! Loads one key registry and one tree per agent from the data directory,
//! ticks every agent once per step and releases held keys on shutdown.
mod agent;
mod config;
mod sim;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tree_content::{ContentFactory, Storage};

use crate::agent::Agent;
use crate::config::RunConfig;
use crate::sim::Simulation;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RunConfig::from_env()?;
    let _guard = setup_logging(config.log_dir.as_deref())?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        agents = config.sim.agents,
        ticks = config.sim.ticks,
        tree = %config.sim.tree,
        "starting simulation"
    );

    let factory = ContentFactory::new(&config.data_dir);
    let registry = factory
        .load_registry(&config.sim.keys)
        .with_context(|| format!("loading key set `{}`", config.sim.keys))?;

    let handlers = agent::handlers();
    let trees = (0..config.sim.agents)
        .map(|id| {
            let name = format!("{}-{}", config.sim.tree, id);
            factory.load_tree(&config.sim.tree, &name, &registry, &handlers, Agent::new(id))
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("loading tree `{}`", config.sim.tree))?;

    let mut sim = Simulation::new(trees, Duration::from_millis(config.sim.tick_ms));
    let outcome = sim.run(config.sim.ticks);
    sim.shutdown();

    for tree in sim.trees() {
        let agent = tree.context();
        tracing::info!(
            tree = tree.name(),
            energy = agent.energy,
            doors = agent.doors,
            horns = agent.horns,
            patrols = agent.patrols,
            "agent summary"
        );
    }
    outcome
}

/// Setup logging to stderr and, when a log directory is given, to a file.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "tree-sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/tree-sim.log", dir.display());
    }
    Ok(guard)
}
