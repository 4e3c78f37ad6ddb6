//! A root behavior together with its traversal state.

use std::sync::Arc;

use crate::{Behavior, BehaviorParameterCollection, BehaviorResult, BehaviorTreeState};

/// One agent's behavior tree.
///
/// The driver calls [`tick`](Self::tick) once per simulation step. Before
/// discarding or re-initializing a tree whose [`status`](Self::status) is
/// `Running`, the driver must call [`reset`](Self::reset); otherwise access
/// keys granted inside the tree stay granted.
pub struct BehaviorTree<C> {
    name: String,
    root: Option<Box<dyn Behavior<C>>>,
    state: BehaviorTreeState<C>,
}

impl<C> BehaviorTree<C> {
    pub fn new(name: impl Into<String>, root: Box<dyn Behavior<C>>, context: C) -> Self {
        Self::from_parts(name, Some(root), context)
    }

    /// A tree that may lack a root, e.g. after a malformed load.
    pub fn from_parts(
        name: impl Into<String>,
        root: Option<Box<dyn Behavior<C>>>,
        context: C,
    ) -> Self {
        Self {
            name: name.into(),
            root,
            state: BehaviorTreeState::new(context),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&dyn Behavior<C>> {
        self.root.as_deref()
    }

    pub fn state(&self) -> &BehaviorTreeState<C> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BehaviorTreeState<C> {
        &mut self.state
    }

    pub fn context(&self) -> &C {
        &self.state.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.state.context
    }

    /// Result of the root's last tick.
    pub fn status(&self) -> Option<BehaviorResult> {
        self.root.as_ref().and_then(|root| root.result())
    }

    /// Ticks the whole tree once with the driver's parameters at the root.
    ///
    /// Returns `None` if the tree has no root.
    pub fn tick(&mut self, parameters: BehaviorParameterCollection) -> Option<BehaviorResult> {
        self.tick_shared(Arc::new(parameters))
    }

    /// Like [`tick`](Self::tick), reusing an already shared parameter set.
    pub fn tick_shared(
        &mut self,
        parameters: Arc<BehaviorParameterCollection>,
    ) -> Option<BehaviorResult> {
        let root = self.root.as_mut()?;
        self.state.parameters = parameters;
        let result = root.tick(&mut self.state);
        tracing::trace!(tree = %self.name, %result, "tree ticked");
        Some(result)
    }

    /// Abandons the current activation, releasing anything the running path
    /// still holds. A no-op for rootless or idle trees.
    pub fn reset(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.reset_behavior(&mut self.state);
            tracing::debug!(tree = %self.name, "tree reset");
        }
    }
}

impl<C> std::fmt::Debug for BehaviorTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("name", &self.name)
            .field("root", &self.root.as_ref().map(|r| r.name().to_owned()))
            .field("status", &self.status())
            .finish()
    }
}
