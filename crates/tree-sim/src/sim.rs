//! Steps every agent's tree once per tick.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use behavior_tree::{BehaviorParameterCollection, BehaviorResult, BehaviorTree};

use crate::agent::Agent;

/// Per-tick tally of root results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub success: usize,
    pub failure: usize,
    pub running: usize,
    pub idle: usize,
}

impl TickSummary {
    fn count(&mut self, result: Option<BehaviorResult>) {
        match result {
            Some(BehaviorResult::Success) => self.success += 1,
            Some(BehaviorResult::Failure) => self.failure += 1,
            Some(BehaviorResult::Running) => self.running += 1,
            None => self.idle += 1,
        }
    }
}

pub struct Simulation {
    trees: Vec<BehaviorTree<Agent>>,
    tick_interval: Duration,
    tick: u64,
}

impl Simulation {
    pub fn new(trees: Vec<BehaviorTree<Agent>>, tick_interval: Duration) -> Self {
        Self {
            trees,
            tick_interval,
            tick: 0,
        }
    }

    pub fn trees(&self) -> &[BehaviorTree<Agent>] {
        &self.trees
    }

    /// Ticks every tree once, each on its own thread.
    ///
    /// Trees only contend on the access keys they share.
    pub fn step(&mut self) -> Result<TickSummary> {
        self.tick += 1;
        let parameters = Arc::new(
            BehaviorParameterCollection::new().with("tick", i64::try_from(self.tick)?),
        );

        let results = thread::scope(|scope| {
            let handles: Vec<_> = self
                .trees
                .iter_mut()
                .map(|tree| {
                    let parameters = Arc::clone(&parameters);
                    scope.spawn(move || tree.tick_shared(parameters))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| anyhow!("agent thread panicked")))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut summary = TickSummary::default();
        for result in results {
            summary.count(result);
        }
        tracing::info!(
            tick = self.tick,
            success = summary.success,
            failure = summary.failure,
            running = summary.running,
            idle = summary.idle,
            "tick complete"
        );
        Ok(summary)
    }

    /// Runs `ticks` steps, sleeping for the tick interval between them.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
            if !self.tick_interval.is_zero() {
                thread::sleep(self.tick_interval);
            }
        }
        Ok(())
    }

    /// Resets every tree still running so held access keys are released.
    pub fn shutdown(&mut self) -> usize {
        let mut reset = 0;
        for tree in &mut self.trees {
            if tree.status() == Some(BehaviorResult::Running) {
                tree.reset();
                reset += 1;
            }
        }
        tracing::info!(reset, "simulation stopped");
        reset
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use behavior_tree::builder::{access_limit, action};
    use behavior_tree::{AccessKey, AccessKeyProvider, BehaviorTreeState, CounterLimitAccessKey};
    use tree_content::{ContentFactory, Storage};

    use super::*;
    use crate::agent::handlers;

    fn shipped_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    #[test]
    fn shipped_guards_run_and_release_their_keys() {
        let factory = ContentFactory::new(shipped_data());
        let config = factory.load_config().expect("config");
        let registry = factory.load_registry(&config.keys).expect("registry");
        assert!(registry.issues().is_empty(), "{:?}", registry.issues());

        let handlers = handlers();
        let trees = (0..6)
            .map(|id| {
                let name = format!("guard-{id}");
                factory
                    .load_tree(&config.tree, &name, &registry, &handlers, Agent::new(id))
                    .expect("tree")
            })
            .collect();
        let mut sim = Simulation::new(trees, Duration::ZERO);

        for _ in 0..30 {
            let summary = sim.step().expect("step");
            assert_eq!(summary.idle, 0);
        }
        sim.shutdown();

        let door = registry.lookup("door").expect("door key");
        assert!(door.is_available());
        let walked: u32 = sim.trees().iter().map(|t| t.context().doors).sum();
        assert!(walked > 0);
    }

    #[test]
    fn shutdown_resets_only_running_trees() {
        let key = Arc::new(CounterLimitAccessKey::new("door", 1));
        let tree = |id: usize| {
            let root = access_limit(
                "gate",
                Arc::clone(&key) as Arc<dyn AccessKey>,
                action("hold", |_: &mut BehaviorTreeState<Agent>| BehaviorResult::Running),
            );
            BehaviorTree::new(format!("holder-{id}"), root.into_behavior(), Agent::new(id))
        };
        let mut sim = Simulation::new(vec![tree(0), tree(1)], Duration::ZERO);

        let summary = sim.step().expect("step");
        assert_eq!(summary.running, 1);
        assert_eq!(summary.success, 1);
        assert_eq!(key.count(), 1);

        assert_eq!(sim.shutdown(), 1);
        assert_eq!(key.count(), 0);
    }
}
