//! Behaviors referenced from more than one position in a tree.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::behavior::NodeCore;
use crate::{Behavior, BehaviorResult, BehaviorTreeState};

/// A handle onto one behavior instance that several containers can hold.
///
/// Every clone ticks the same node, so its cached result and working data
/// are shared between positions; each position still binds its own
/// parameters through its container. A node must not contain a handle to
/// itself. If a handler panicked while the node was locked, every later tick
/// fails.
pub struct SharedBehavior<C> {
    core: NodeCore,
    inner: Arc<Mutex<Box<dyn Behavior<C>>>>,
}

impl<C> SharedBehavior<C> {
    pub fn new(behavior: Box<dyn Behavior<C>>) -> Self {
        let core = NodeCore::new(behavior.name(), behavior.kind());
        Self {
            core,
            inner: Arc::new(Mutex::new(behavior)),
        }
    }

    /// Number of handles onto the shared node.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    fn lock(&self) -> Option<MutexGuard<'_, Box<dyn Behavior<C>>>> {
        self.inner.lock().ok()
    }
}

impl<C> Clone for SharedBehavior<C> {
    fn clone(&self) -> Self {
        Self {
            core: NodeCore::new(self.core.name(), self.core.kind()),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Behavior<C> for SharedBehavior<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        match self.lock() {
            Some(mut inner) => inner.tick(state),
            None => {
                tracing::warn!(node = self.core.name(), "shared behavior poisoned");
                BehaviorResult::Failure
            }
        }
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        if let Some(mut inner) = self.lock() {
            inner.reset_behavior(state);
        }
        self.core.clear();
    }

    /// The shared node's result, which may have been produced through
    /// another handle.
    fn result(&self) -> Option<BehaviorResult> {
        match self.lock() {
            Some(inner) => inner.result(),
            None => self.core.result(),
        }
    }
}
