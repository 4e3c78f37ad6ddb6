//! Leaf nodes: user-supplied actions and conditions.

use crate::behavior::{BehaviorKind, NodeCore};
use crate::status::was_running;
use crate::{Behavior, BehaviorResult, BehaviorTreeState};

/// Handler driving an [`Action`]. May return `Running` to span ticks.
pub type ActionHandler<C> =
    Box<dyn FnMut(&mut BehaviorTreeState<C>) -> BehaviorResult + Send + 'static>;

/// Invoked when a `Running` action is abandoned.
pub type ActionResetHandler<C> = Box<dyn FnMut(&mut BehaviorTreeState<C>) + Send + 'static>;

/// Predicate driving a [`Condition`].
pub type ConditionHandler<C> = Box<dyn FnMut(&BehaviorTreeState<C>) -> bool + Send + 'static>;

/// Executes a user handler.
///
/// An action without a handler fails every tick.
pub struct Action<C> {
    core: NodeCore,
    handler: Option<ActionHandler<C>>,
    on_reset: Option<ActionResetHandler<C>>,
}

impl<C> Action<C> {
    pub fn new(
        name: impl Into<String>,
        handler: impl FnMut(&mut BehaviorTreeState<C>) -> BehaviorResult + Send + 'static,
    ) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Action),
            handler: Some(Box::new(handler)),
            on_reset: None,
        }
    }

    /// An action with no handler bound yet.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Action),
            handler: None,
            on_reset: None,
        }
    }

    pub fn from_boxed(
        name: impl Into<String>,
        handler: Option<ActionHandler<C>>,
        on_reset: Option<ActionResetHandler<C>>,
    ) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Action),
            handler,
            on_reset,
        }
    }

    /// Registers a handler to run when this action is reset mid-execution.
    pub fn on_reset(
        mut self,
        handler: impl FnMut(&mut BehaviorTreeState<C>) + Send + 'static,
    ) -> Self {
        self.on_reset = Some(Box::new(handler));
        self
    }
}

impl<C> Behavior<C> for Action<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        match self.handler.as_mut() {
            Some(handler) => handler(state),
            None => BehaviorResult::Failure,
        }
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        if was_running(self.core.result())
            && let Some(on_reset) = self.on_reset.as_mut()
        {
            on_reset(state);
        }
        self.core.clear();
    }
}

/// Evaluates a predicate: `true` is `Success`, `false` is `Failure`.
pub struct Condition<C> {
    core: NodeCore,
    handler: Option<ConditionHandler<C>>,
}

impl<C> Condition<C> {
    pub fn new(
        name: impl Into<String>,
        handler: impl FnMut(&BehaviorTreeState<C>) -> bool + Send + 'static,
    ) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Condition),
            handler: Some(Box::new(handler)),
        }
    }

    pub fn from_boxed(name: impl Into<String>, handler: Option<ConditionHandler<C>>) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Condition),
            handler,
        }
    }
}

impl<C> Behavior<C> for Condition<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        match self.handler.as_mut() {
            Some(handler) => BehaviorResult::from_bool(handler(state)),
            None => BehaviorResult::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        resets: u32,
    }

    #[test]
    fn action_result_is_cached_after_first_tick() {
        let mut action = Action::new("work", |state: &mut BehaviorTreeState<Counter>| {
            state.context.ticks += 1;
            BehaviorResult::Failure
        });
        let mut state = BehaviorTreeState::new(Counter::default());

        assert_eq!(action.result(), None);
        assert_eq!(action.tick(&mut state), BehaviorResult::Failure);
        assert_eq!(action.result(), Some(BehaviorResult::Failure));
        assert_eq!(state.context.ticks, 1);
    }

    #[test]
    fn unbound_action_fails() {
        let mut action = Action::<()>::unbound("missing");
        let mut state = BehaviorTreeState::new(());
        assert_eq!(action.tick(&mut state), BehaviorResult::Failure);
    }

    #[test]
    fn reset_handler_runs_only_when_running() {
        let mut action = Action::new("walk", |_: &mut BehaviorTreeState<Counter>| {
            BehaviorResult::Running
        })
        .on_reset(|state| state.context.resets += 1);
        let mut state = BehaviorTreeState::new(Counter::default());

        action.reset_behavior(&mut state);
        assert_eq!(state.context.resets, 0);

        action.tick(&mut state);
        action.reset_behavior(&mut state);
        assert_eq!(state.context.resets, 1);
        assert_eq!(action.result(), None);
    }

    #[test]
    fn condition_maps_bool() {
        let mut cond = Condition::new("flag", |state: &BehaviorTreeState<bool>| state.context);
        let mut state = BehaviorTreeState::new(true);
        assert_eq!(cond.tick(&mut state), BehaviorResult::Success);
        state.context = false;
        assert_eq!(cond.tick(&mut state), BehaviorResult::Failure);
    }
}
