//! Per-tree traversal state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::parameters::BehaviorParameterCollection;
use crate::record::Value;

/// Tree-wide scratch data shared by every node of one tree.
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    entries: HashMap<String, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Mutable context threaded by `&mut` through one tree walk.
///
/// Exactly one instance exists per [`BehaviorTree`](crate::BehaviorTree); it
/// is reused every tick and never shared between trees.
///
/// `parameters` always holds the collection bound on the incoming edge of the
/// node currently being ticked. Containers swap it on the way down and
/// restore it on the way back up.
#[derive(Debug)]
pub struct BehaviorTreeState<C> {
    pub parameters: Arc<BehaviorParameterCollection>,
    pub blackboard: Blackboard,
    pub context: C,
}

impl<C> BehaviorTreeState<C> {
    pub fn new(context: C) -> Self {
        Self {
            parameters: Arc::new(BehaviorParameterCollection::new()),
            blackboard: Blackboard::new(),
            context,
        }
    }

    /// Parameters visible to the node being ticked.
    pub fn parameters(&self) -> &BehaviorParameterCollection {
        &self.parameters
    }

    /// Swaps in `parameters`, returning the collection that was active.
    pub(crate) fn enter(
        &mut self,
        parameters: Arc<BehaviorParameterCollection>,
    ) -> Arc<BehaviorParameterCollection> {
        std::mem::replace(&mut self.parameters, parameters)
    }
}

impl<C: Default> Default for BehaviorTreeState<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
