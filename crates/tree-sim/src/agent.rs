//! Demo agents and the handlers their trees bind to.

use behavior_tree::{BehaviorResult, BehaviorTreeState, HandlerError, HandlerRegistry};

pub const MAX_ENERGY: i64 = 10;

/// Per-agent context threaded through every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent {
    pub id: usize,
    pub energy: i64,
    /// Steps taken through the current door.
    pub progress: i64,
    pub doors: u32,
    pub horns: u32,
    pub patrols: u32,
}

impl Agent {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            energy: (id as i64 * 3) % (MAX_ENERGY + 1),
            ..Self::default()
        }
    }
}

type State = BehaviorTreeState<Agent>;

/// Handlers referenced by the shipped trees.
pub fn handlers() -> HandlerRegistry<Agent> {
    HandlerRegistry::new()
        .decorator("has_energy", |state: &State| {
            let needed = state
                .parameters()
                .get_int("min_energy")
                .ok_or_else(|| HandlerError::MissingParameter("min_energy".into()))?;
            Ok(state.context.energy >= needed)
        })
        .action("walk_through", |state: &mut State| {
            let steps = state.parameters().get_int("steps").unwrap_or(1);
            state.context.progress += 1;
            state.context.energy -= 1;
            if state.context.progress < steps {
                return BehaviorResult::Running;
            }
            state.context.progress = 0;
            state.context.doors += 1;
            tracing::debug!(agent = state.context.id, "walked through the door");
            BehaviorResult::Success
        })
        .action_reset("walk_through", |state: &mut State| {
            state.context.progress = 0;
        })
        .action("sound_horn", |state: &mut State| {
            state.context.horns += 1;
            tracing::info!(agent = state.context.id, "sounded the horn");
            BehaviorResult::Success
        })
        .action("rest", |state: &mut State| {
            state.context.energy = (state.context.energy + 2).min(MAX_ENERGY);
            if state.context.energy == MAX_ENERGY {
                BehaviorResult::Success
            } else {
                BehaviorResult::Running
            }
        })
        .action("patrol", |state: &mut State| {
            state.context.patrols += 1;
            BehaviorResult::Success
        })
}

#[cfg(test)]
mod tests {
    use behavior_tree::{
        BehaviorParameterCollection, Record, SharedAccessKeys, TreeLoader,
    };

    use super::*;

    fn gated_walk(min_energy: Option<i64>) -> Record {
        let mut gate = Record::new("Decorator")
            .with_attr("Handler", "has_energy")
            .with_attr("NeverFail", false)
            .with_child(Record::new("Action").with_attr("Name", "walk_through"));
        if let Some(min) = min_energy {
            gate = Record::new("Child")
                .with_child(
                    Record::new("Parameters").with_child(
                        Record::new("Parameter")
                            .with_attr("Name", "min_energy")
                            .with_attr("Value", min),
                    ),
                )
                .with_child(gate);
        }
        Record::new("Sequence").with_child(gate)
    }

    #[test]
    fn energy_is_spread_across_agents() {
        assert_eq!(Agent::new(0).energy, 0);
        assert_eq!(Agent::new(2).energy, 6);
        assert!(Agent::new(7).energy <= MAX_ENERGY);
    }

    #[test]
    fn energy_gate_denies_without_its_parameter() {
        let (handlers, keys) = (handlers(), SharedAccessKeys::new("none"));
        let mut loaded =
            TreeLoader::new(&handlers, &keys).load("probe", &gated_walk(None), Agent::new(3));

        assert!(loaded.issues.is_empty());
        assert_eq!(
            loaded.tree.tick(BehaviorParameterCollection::new()),
            Some(BehaviorResult::Failure)
        );
        assert_eq!(loaded.tree.context().doors, 0);
    }

    #[test]
    fn energy_gate_admits_rested_agents() {
        let (handlers, keys) = (handlers(), SharedAccessKeys::new("none"));
        let mut loaded =
            TreeLoader::new(&handlers, &keys).load("probe", &gated_walk(Some(5)), Agent::new(2));

        assert_eq!(
            loaded.tree.tick(BehaviorParameterCollection::new()),
            Some(BehaviorResult::Success)
        );
        assert_eq!(loaded.tree.context().doors, 1);
        assert_eq!(loaded.tree.context().energy, 5);
    }
}
