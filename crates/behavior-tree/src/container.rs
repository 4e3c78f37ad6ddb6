//! Parent-to-child edges.

use std::sync::Arc;

use crate::{Behavior, BehaviorParameterCollection, BehaviorResult, BehaviorTreeState};

/// Binds a child behavior to the parameter set scoped to this edge.
///
/// The same behavior may sit under several containers with different
/// parameters by wrapping it in a [`SharedBehavior`](crate::SharedBehavior).
pub struct BehaviorContainer<C> {
    behavior: Box<dyn Behavior<C>>,
    parameters: Option<Arc<BehaviorParameterCollection>>,
}

impl<C> BehaviorContainer<C> {
    pub fn new(behavior: Box<dyn Behavior<C>>) -> Self {
        Self {
            behavior,
            parameters: None,
        }
    }

    pub fn with_parameters(
        behavior: Box<dyn Behavior<C>>,
        parameters: BehaviorParameterCollection,
    ) -> Self {
        Self {
            behavior,
            parameters: Some(Arc::new(parameters)),
        }
    }

    pub fn behavior(&self) -> &dyn Behavior<C> {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Behavior<C> {
        self.behavior.as_mut()
    }

    pub fn into_behavior(self) -> Box<dyn Behavior<C>> {
        self.behavior
    }

    /// Parameter set bound to this edge, if any.
    pub fn parameters(&self) -> Option<&BehaviorParameterCollection> {
        self.parameters.as_deref()
    }

    /// Cached result of the child.
    pub fn result(&self) -> Option<BehaviorResult> {
        self.behavior.result()
    }

    /// Ticks the child with this edge's parameters in scope.
    ///
    /// Without a bound set the child keeps seeing its parent's parameters.
    /// Either way the parent's set is active again once this returns.
    pub fn tick(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        self.scoped(state, |behavior, state| behavior.tick(state))
    }

    /// Resets the child with this edge's parameters in scope, so reset
    /// handlers observe the same parameters as the ticks they undo.
    pub fn reset(&mut self, state: &mut BehaviorTreeState<C>) {
        self.scoped(state, |behavior, state| behavior.reset_behavior(state))
    }

    fn scoped<R>(
        &mut self,
        state: &mut BehaviorTreeState<C>,
        f: impl FnOnce(&mut dyn Behavior<C>, &mut BehaviorTreeState<C>) -> R,
    ) -> R {
        match &self.parameters {
            Some(parameters) => {
                let outer = state.enter(Arc::clone(parameters));
                let out = f(self.behavior.as_mut(), state);
                state.enter(outer);
                out
            }
            None => f(self.behavior.as_mut(), state),
        }
    }
}

impl<C> std::fmt::Debug for BehaviorContainer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorContainer")
            .field("behavior", &self.behavior.name())
            .field("parameters", &self.parameters)
            .finish()
    }
}
