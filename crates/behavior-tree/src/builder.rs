//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `BehaviorContainer::new(Box::new(Sequence::new(name, vec![...])))`,
//! trees assembled in code can use `sequence(name, vec![...])`. Every helper
//! returns a [`BehaviorContainer`] without parameters; use [`with_params`] to
//! bind a parameter set to an edge.

use std::sync::Arc;

use crate::access_key::AccessKey;
use crate::composite::{Concurrent, FailurePolicy, Selector, Sequence, SuccessPolicy};
use crate::{
    AccessLimitDecorator, Action, Behavior, BehaviorContainer, BehaviorParameterCollection,
    BehaviorResult, BehaviorTreeState, Condition, Decorator, HandlerError,
};

#[inline]
pub fn node<C>(behavior: impl Behavior<C> + 'static) -> BehaviorContainer<C> {
    BehaviorContainer::new(Box::new(behavior))
}

/// Rebinds `container`'s behavior with `parameters` on its edge.
pub fn with_params<C>(
    container: BehaviorContainer<C>,
    parameters: BehaviorParameterCollection,
) -> BehaviorContainer<C> {
    BehaviorContainer::with_parameters(container.into_behavior(), parameters)
}

#[inline]
pub fn sequence<C: 'static>(
    name: impl Into<String>,
    children: Vec<BehaviorContainer<C>>,
) -> BehaviorContainer<C> {
    node(Sequence::new(name, children))
}

#[inline]
pub fn selector<C: 'static>(
    name: impl Into<String>,
    children: Vec<BehaviorContainer<C>>,
) -> BehaviorContainer<C> {
    node(Selector::new(name, children))
}

#[inline]
pub fn concurrent<C: 'static>(
    name: impl Into<String>,
    failure: FailurePolicy,
    success: SuccessPolicy,
    children: Vec<BehaviorContainer<C>>,
) -> BehaviorContainer<C> {
    node(Concurrent::new(name, children).with_policies(failure, success))
}

#[inline]
pub fn action<C: 'static>(
    name: impl Into<String>,
    handler: impl FnMut(&mut BehaviorTreeState<C>) -> BehaviorResult + Send + 'static,
) -> BehaviorContainer<C> {
    node(Action::new(name, handler))
}

#[inline]
pub fn condition<C: 'static>(
    name: impl Into<String>,
    handler: impl FnMut(&BehaviorTreeState<C>) -> bool + Send + 'static,
) -> BehaviorContainer<C> {
    node(Condition::new(name, handler))
}

/// A handler-gated decorator with the default `never_fail` behavior.
pub fn decorator<C: 'static>(
    name: impl Into<String>,
    handler: impl FnMut(&BehaviorTreeState<C>) -> Result<bool, HandlerError> + Send + 'static,
    child: BehaviorContainer<C>,
) -> BehaviorContainer<C> {
    node(Decorator::new(name, handler).with_container(child))
}

/// A decorator admitting `child` only while it holds a grant on `key`.
pub fn access_limit<C: 'static>(
    name: impl Into<String>,
    key: Arc<dyn AccessKey>,
    child: BehaviorContainer<C>,
) -> BehaviorContainer<C> {
    node(AccessLimitDecorator::access_limit(name, key).with_container(child))
}
