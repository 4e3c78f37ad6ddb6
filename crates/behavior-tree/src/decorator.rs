//! Decorator behavior nodes.
//!
//! A decorator wraps a single child and decides, each time the child is not
//! already mid-execution, whether it may run at all. The decision is made by
//! an [`Admission`] policy: a user handler ([`HandlerAdmission`]) or a shared
//! access key ([`AccessLimit`](crate::AccessLimit)).
//!
//! # Tick protocol
//!
//! 1. If the child's cached result is `Running`, it is resumed unconditionally
//! 2. Otherwise the admission policy is consulted
//! 3. If admitted, the child is ticked and its result propagated
//! 4. If denied (or there is no child), the result is `Failure`
//!
//! With `never_fail` set (the default), `Failure` is laundered into `Success`
//! so ancestors only ever see `Running` or `Success` from this node.

use crate::behavior::{BehaviorKind, NodeCore};
use crate::container::BehaviorContainer;
use crate::error::HandlerError;
use crate::status::was_running;
use crate::{Behavior, BehaviorParameterCollection, BehaviorResult, BehaviorTreeState};

/// Refinement of [`BehaviorKind::Decorator`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecoratorKind {
    /// Admission decided by a user handler.
    Default,
    /// Admission decided by granting a shared access key.
    AccessLimit,
}

/// Decides whether a decorator's child may start.
pub trait Admission<C>: Send {
    fn kind(&self) -> DecoratorKind;

    /// Called only when the child is not already `Running`.
    fn admit(&mut self, state: &BehaviorTreeState<C>) -> bool;

    /// Called when an admitted child completes or is abandoned.
    fn finish(&mut self) {}
}

/// User handler deciding admission from the current traversal state.
pub type DecoratorHandler<C> =
    Box<dyn FnMut(&BehaviorTreeState<C>) -> Result<bool, HandlerError> + Send + 'static>;

/// Admission through an optional user handler.
///
/// Without a handler every entry is admitted. A handler error denies and is
/// logged. Panics are not caught: a panicking handler unwinds out of the
/// whole tick.
pub struct HandlerAdmission<C> {
    handler: Option<DecoratorHandler<C>>,
}

impl<C> HandlerAdmission<C> {
    pub fn new(handler: Option<DecoratorHandler<C>>) -> Self {
        Self { handler }
    }
}

impl<C> Admission<C> for HandlerAdmission<C> {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::Default
    }

    fn admit(&mut self, state: &BehaviorTreeState<C>) -> bool {
        let Some(handler) = self.handler.as_mut() else {
            return true;
        };
        match handler(state) {
            Ok(admitted) => admitted,
            Err(error) => {
                tracing::warn!(%error, "decorator handler failed, denying admission");
                false
            }
        }
    }
}

/// Wraps a single child behind an admission policy.
pub struct Decorator<C, A = HandlerAdmission<C>> {
    core: NodeCore,
    child: Option<BehaviorContainer<C>>,
    admission: A,
    never_fail: bool,
}

impl<C> Decorator<C> {
    /// Creates a decorator whose admission is decided by `handler`.
    pub fn new(
        name: impl Into<String>,
        handler: impl FnMut(&BehaviorTreeState<C>) -> Result<bool, HandlerError> + Send + 'static,
    ) -> Self {
        Self::with_admission(name, HandlerAdmission::new(Some(Box::new(handler))))
    }

    /// Creates a decorator that admits every entry.
    pub fn pass_through(name: impl Into<String>) -> Self {
        Self::with_admission(name, HandlerAdmission::new(None))
    }
}

impl<C, A: Admission<C>> Decorator<C, A> {
    pub fn with_admission(name: impl Into<String>, admission: A) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Decorator),
            child: None,
            admission,
            never_fail: true,
        }
    }

    /// Builder-style [`set_child`](Self::set_child) without parameters.
    pub fn with_child(mut self, child: Box<dyn Behavior<C>>) -> Self {
        self.child = Some(BehaviorContainer::new(child));
        self
    }

    pub fn with_container(mut self, container: BehaviorContainer<C>) -> Self {
        self.child = Some(container);
        self
    }

    /// Replaces the child, optionally binding parameters to the new edge.
    pub fn set_child(
        &mut self,
        child: Box<dyn Behavior<C>>,
        parameters: Option<BehaviorParameterCollection>,
    ) {
        self.child = Some(match parameters {
            Some(parameters) => BehaviorContainer::with_parameters(child, parameters),
            None => BehaviorContainer::new(child),
        });
    }

    pub fn with_never_fail(mut self, never_fail: bool) -> Self {
        self.never_fail = never_fail;
        self
    }

    pub fn never_fail(&self) -> bool {
        self.never_fail
    }

    pub fn decorator_kind(&self) -> DecoratorKind {
        self.admission.kind()
    }

    pub fn admission(&self) -> &A {
        &self.admission
    }

    pub fn child(&self) -> Option<&BehaviorContainer<C>> {
        self.child.as_ref()
    }
}

impl<C, A: Admission<C>> Behavior<C> for Decorator<C, A> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        let result = match self.child.as_mut() {
            None => BehaviorResult::Failure,
            Some(child) => {
                let admitted = if was_running(child.result()) {
                    // resume: admission is only decided at entry
                    true
                } else {
                    self.admission.admit(state)
                };

                if admitted {
                    let result = child.tick(state);
                    if result.is_complete() {
                        self.admission.finish();
                    }
                    result
                } else {
                    tracing::trace!(node = self.core.name(), "admission denied");
                    BehaviorResult::Failure
                }
            }
        };

        if self.never_fail {
            result.launder()
        } else {
            result
        }
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        if was_running(self.core.result()) {
            if let Some(child) = self.child.as_mut() {
                child.reset(state);
            }
            self.admission.finish();
        }
        self.core.clear();
    }

    fn children(&self) -> &[BehaviorContainer<C>] {
        self.child.as_slice()
    }
}
