//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, the fundamental abstraction for
//! all behavior tree nodes. The trait is generic over the host's agent
//! context `C`, which nodes reach through [`BehaviorTreeState::context`].
//!
//! Every node caches the result of its last tick. Composites and decorators
//! consult that cache on the next tick to resume a `Running` child instead of
//! re-evaluating it from scratch.

use crate::container::BehaviorContainer;
use crate::{BehaviorResult, BehaviorTreeState};

/// Broad category of a node, as exposed to authoring tools.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorKind {
    Action,
    Condition,
    Decorator,
    Composite,
}

/// Identity and cached result shared by every node implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCore {
    name: String,
    kind: BehaviorKind,
    result: Option<BehaviorResult>,
}

impl NodeCore {
    pub fn new(name: impl Into<String>, kind: BehaviorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            result: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BehaviorKind {
        self.kind
    }

    pub fn result(&self) -> Option<BehaviorResult> {
        self.result
    }

    pub fn record(&mut self, result: BehaviorResult) {
        self.result = Some(result);
    }

    /// Back to "not yet ticked".
    pub fn clear(&mut self) {
        self.result = None;
    }
}

/// A behavior tree node.
///
/// Implementors provide [`behave`](Behavior::behave) (the node-specific
/// decision logic) and access to their [`NodeCore`]. The provided
/// [`tick`](Behavior::tick) runs `behave` and records the outcome.
pub trait Behavior<C>: Send {
    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// Node-specific decision logic for one tick.
    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult;

    /// Evaluate this node and cache the result.
    fn tick(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        let result = self.behave(state);
        self.core_mut().record(result);
        tracing::trace!(node = self.name(), %result, "ticked");
        result
    }

    /// Abandon this node's current activation.
    ///
    /// Nodes whose cached result is `Running` reset the child path that was
    /// active before clearing their own state. Resetting a node that never
    /// ran, or already completed, only clears its cached result.
    fn reset_behavior(&mut self, _state: &mut BehaviorTreeState<C>) {
        self.core_mut().clear();
    }

    /// Child edges, in declaration order.
    fn children(&self) -> &[BehaviorContainer<C>] {
        &[]
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn kind(&self) -> BehaviorKind {
        self.core().kind()
    }

    /// Result of the last tick, or `None` if the node has not run since
    /// construction or its last reset.
    fn result(&self) -> Option<BehaviorResult> {
        self.core().result()
    }
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// forwarding every method (including overridden `tick` and
/// `reset_behavior`) to the boxed node.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn core(&self) -> &NodeCore {
        (**self).core()
    }

    #[inline]
    fn core_mut(&mut self) -> &mut NodeCore {
        (**self).core_mut()
    }

    #[inline]
    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        (**self).behave(state)
    }

    #[inline]
    fn tick(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        (**self).tick(state)
    }

    #[inline]
    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        (**self).reset_behavior(state)
    }

    #[inline]
    fn children(&self) -> &[BehaviorContainer<C>] {
        (**self).children()
    }

    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn kind(&self) -> BehaviorKind {
        (**self).kind()
    }

    #[inline]
    fn result(&self) -> Option<BehaviorResult> {
        (**self).result()
    }
}
