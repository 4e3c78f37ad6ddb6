//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors:
//! [`Sequence`] (AND logic), [`Selector`] (OR logic) and [`Concurrent`]
//! (all children every tick).
//!
//! `Sequence` and `Selector` remember the child that returned `Running` and
//! resume from it on the next tick, without re-ticking the siblings before it.

use crate::behavior::{BehaviorKind, NodeCore};
use crate::container::BehaviorContainer;
use crate::status::was_running;
use crate::{Behavior, BehaviorResult, BehaviorTreeState};

/// Refinement of [`BehaviorKind::Composite`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositeKind {
    Sequence,
    Selector,
    Concurrent,
}

/// Executes children in order until one does not succeed.
///
/// # Semantics
///
/// - Starts at the child that was `Running` last tick, or at the first child
/// - A `Success` child moves on to the next one
/// - A `Failure` or `Running` child stops the pass and is returned
/// - If every child succeeds, the sequence returns `Success`
///
/// An empty sequence succeeds.
pub struct Sequence<C> {
    core: NodeCore,
    children: Vec<BehaviorContainer<C>>,
    running: Option<usize>,
}

impl<C> Sequence<C> {
    pub fn new(name: impl Into<String>, children: Vec<BehaviorContainer<C>>) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Composite),
            children,
            running: None,
        }
    }

    /// Index of the child that will be resumed next tick.
    pub fn running_index(&self) -> Option<usize> {
        self.running
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        let start = self.running.take().unwrap_or(0);
        for index in start..self.children.len() {
            match self.children[index].tick(state) {
                BehaviorResult::Success => continue,
                BehaviorResult::Running => {
                    self.running = Some(index);
                    return BehaviorResult::Running;
                }
                BehaviorResult::Failure => return BehaviorResult::Failure,
            }
        }
        BehaviorResult::Success
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        reset_resume_point(&self.core, &mut self.children, &mut self.running, state);
        self.core.clear();
    }

    fn children(&self) -> &[BehaviorContainer<C>] {
        &self.children
    }
}

/// Executes children in order until one does not fail.
///
/// # Semantics
///
/// - Starts at the child that was `Running` last tick, or at the first child
/// - A `Failure` child moves on to the next one
/// - A `Success` or `Running` child stops the pass and is returned
/// - If every child fails, the selector returns `Failure`
///
/// An empty selector fails.
pub struct Selector<C> {
    core: NodeCore,
    children: Vec<BehaviorContainer<C>>,
    running: Option<usize>,
}

impl<C> Selector<C> {
    pub fn new(name: impl Into<String>, children: Vec<BehaviorContainer<C>>) -> Self {
        Self {
            core: NodeCore::new(name, BehaviorKind::Composite),
            children,
            running: None,
        }
    }

    pub fn running_index(&self) -> Option<usize> {
        self.running
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        let start = self.running.take().unwrap_or(0);
        for index in start..self.children.len() {
            match self.children[index].tick(state) {
                BehaviorResult::Failure => continue,
                BehaviorResult::Running => {
                    self.running = Some(index);
                    return BehaviorResult::Running;
                }
                BehaviorResult::Success => return BehaviorResult::Success,
            }
        }
        BehaviorResult::Failure
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        reset_resume_point(&self.core, &mut self.children, &mut self.running, state);
        self.core.clear();
    }

    fn children(&self) -> &[BehaviorContainer<C>] {
        &self.children
    }
}

/// Resets the single active child of a resuming composite.
fn reset_resume_point<C>(
    core: &NodeCore,
    children: &mut [BehaviorContainer<C>],
    running: &mut Option<usize>,
    state: &mut BehaviorTreeState<C>,
) {
    let active = running.take();
    if !was_running(core.result()) {
        return;
    }
    if let Some(child) = active.and_then(|index| children.get_mut(index)) {
        child.reset(state);
    }
}

/// When a [`Concurrent`] node fails.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Fail as soon as any child fails.
    #[default]
    FailOnOne,
    /// Fail only once every child has failed.
    FailOnAll,
}

/// When a [`Concurrent`] node succeeds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SuccessPolicy {
    /// Succeed as soon as any child succeeds.
    SucceedOnOne,
    /// Succeed only once every child has succeeded.
    #[default]
    SucceedOnAll,
}

/// Ticks every child each tick.
///
/// # Semantics
///
/// - Children that already completed during the current activation keep
///   their result and are not ticked again
/// - The failure policy is checked before the success policy
/// - Once every child has completed without meeting either policy, the node
///   fails
/// - When the node completes, children still `Running` are reset
///
/// An empty concurrent node succeeds.
pub struct Concurrent<C> {
    core: NodeCore,
    children: Vec<BehaviorContainer<C>>,
    failure_policy: FailurePolicy,
    success_policy: SuccessPolicy,
    completed: Vec<Option<BehaviorResult>>,
}

impl<C> Concurrent<C> {
    pub fn new(name: impl Into<String>, children: Vec<BehaviorContainer<C>>) -> Self {
        let completed = vec![None; children.len()];
        Self {
            core: NodeCore::new(name, BehaviorKind::Composite),
            children,
            failure_policy: FailurePolicy::default(),
            success_policy: SuccessPolicy::default(),
            completed,
        }
    }

    pub fn with_policies(mut self, failure: FailurePolicy, success: SuccessPolicy) -> Self {
        self.failure_policy = failure;
        self.success_policy = success;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn success_policy(&self) -> SuccessPolicy {
        self.success_policy
    }

    fn decide(&self) -> BehaviorResult {
        let total = self.children.len();
        let mut successes = 0;
        let mut failures = 0;
        for result in self.completed.iter().flatten() {
            match result {
                BehaviorResult::Success => successes += 1,
                BehaviorResult::Failure => failures += 1,
                BehaviorResult::Running => {}
            }
        }

        let failed = match self.failure_policy {
            FailurePolicy::FailOnOne => failures > 0,
            FailurePolicy::FailOnAll => total > 0 && failures == total,
        };
        if failed {
            return BehaviorResult::Failure;
        }

        let succeeded = match self.success_policy {
            SuccessPolicy::SucceedOnOne => successes > 0,
            SuccessPolicy::SucceedOnAll => successes == total,
        };
        if succeeded {
            return BehaviorResult::Success;
        }

        if successes + failures == total {
            BehaviorResult::Failure
        } else {
            BehaviorResult::Running
        }
    }

    /// Resets children still mid-execution and forgets completed ones.
    fn settle(&mut self, state: &mut BehaviorTreeState<C>) {
        for (child, done) in self.children.iter_mut().zip(self.completed.iter_mut()) {
            if done.is_none() && was_running(child.result()) {
                child.reset(state);
            }
            *done = None;
        }
    }
}

impl<C> Behavior<C> for Concurrent<C> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn behave(&mut self, state: &mut BehaviorTreeState<C>) -> BehaviorResult {
        for (child, done) in self.children.iter_mut().zip(self.completed.iter_mut()) {
            if done.is_some() {
                continue;
            }
            let result = child.tick(state);
            if result.is_complete() {
                *done = Some(result);
            }
        }

        let result = self.decide();
        if result.is_complete() {
            self.settle(state);
        }
        result
    }

    fn reset_behavior(&mut self, state: &mut BehaviorTreeState<C>) {
        if was_running(self.core.result()) {
            self.settle(state);
        }
        self.core.clear();
    }

    fn children(&self) -> &[BehaviorContainer<C>] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::Action;

    #[derive(Default)]
    struct TestContext {
        value: i32,
        log: Vec<&'static str>,
    }

    fn leaf(name: &'static str, result: BehaviorResult) -> BehaviorContainer<TestContext> {
        BehaviorContainer::new(Box::new(Action::new(
            name,
            move |state: &mut BehaviorTreeState<TestContext>| {
                state.context.log.push(name);
                result
            },
        )))
    }

    fn increment() -> BehaviorContainer<TestContext> {
        BehaviorContainer::new(Box::new(Action::new(
            "increment",
            |state: &mut BehaviorTreeState<TestContext>| {
                state.context.value += 1;
                BehaviorResult::Success
            },
        )))
    }

    /// Runs for `ticks` ticks, then succeeds.
    fn slow(name: &'static str, ticks: u32) -> BehaviorContainer<TestContext> {
        let mut remaining = ticks;
        BehaviorContainer::new(Box::new(Action::new(
            name,
            move |state: &mut BehaviorTreeState<TestContext>| {
                state.context.log.push(name);
                if remaining == 0 {
                    remaining = ticks;
                    BehaviorResult::Success
                } else {
                    remaining -= 1;
                    BehaviorResult::Running
                }
            },
        )))
    }

    #[test]
    fn sequence_all_success() {
        let mut seq = Sequence::new("seq", vec![increment(), increment()]);
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(seq.tick(&mut state), BehaviorResult::Success);
        assert_eq!(state.context.value, 2);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut seq = Sequence::new(
            "seq",
            vec![increment(), leaf("fail", BehaviorResult::Failure), increment()],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(seq.tick(&mut state), BehaviorResult::Failure);
        assert_eq!(state.context.value, 1);
    }

    #[test]
    fn sequence_resumes_running_child_without_reticking_earlier_ones() {
        let mut seq = Sequence::new(
            "seq",
            vec![leaf("a", BehaviorResult::Success), slow("b", 1), leaf("c", BehaviorResult::Success)],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(seq.tick(&mut state), BehaviorResult::Running);
        assert_eq!(seq.running_index(), Some(1));
        assert_eq!(seq.tick(&mut state), BehaviorResult::Success);
        assert_eq!(state.context.log, ["a", "b", "b", "c"]);
        assert_eq!(seq.running_index(), None);
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let mut sel = Selector::new(
            "sel",
            vec![
                leaf("fail", BehaviorResult::Failure),
                increment(),
                leaf("never", BehaviorResult::Success),
            ],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(sel.tick(&mut state), BehaviorResult::Success);
        assert_eq!(state.context.value, 1);
        assert_eq!(state.context.log, ["fail"]);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let mut sel = Selector::new(
            "sel",
            vec![leaf("a", BehaviorResult::Failure), leaf("b", BehaviorResult::Failure)],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(sel.tick(&mut state), BehaviorResult::Failure);
    }

    #[test]
    fn selector_resumes_running_child() {
        let mut sel = Selector::new("sel", vec![leaf("a", BehaviorResult::Failure), slow("b", 2)]);
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(sel.tick(&mut state), BehaviorResult::Running);
        assert_eq!(sel.tick(&mut state), BehaviorResult::Running);
        assert_eq!(sel.tick(&mut state), BehaviorResult::Success);
        assert_eq!(state.context.log, ["a", "b", "b", "b"]);
    }

    #[test]
    fn empty_composites_are_vacuous() {
        let mut state = BehaviorTreeState::new(TestContext::default());
        assert_eq!(
            Sequence::new("seq", Vec::new()).tick(&mut state),
            BehaviorResult::Success
        );
        assert_eq!(
            Selector::new("sel", Vec::new()).tick(&mut state),
            BehaviorResult::Failure
        );
    }

    #[test]
    fn concurrent_succeed_on_all_waits_for_every_child() {
        let mut node = Concurrent::new(
            "both",
            vec![leaf("instant", BehaviorResult::Success), slow("slow", 1)],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(node.tick(&mut state), BehaviorResult::Running);
        assert_eq!(node.tick(&mut state), BehaviorResult::Success);
        // the instant child completed on tick one and is not re-ticked
        assert_eq!(state.context.log, ["instant", "slow", "slow"]);
    }

    #[test]
    fn concurrent_fail_on_one_resets_running_siblings() {
        let mut node = Concurrent::new(
            "guarded",
            vec![slow("slow", 5), leaf("fail", BehaviorResult::Failure)],
        );
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(node.tick(&mut state), BehaviorResult::Failure);
        assert_eq!(node.children()[0].result(), None);
        assert_eq!(node.children()[1].result(), Some(BehaviorResult::Failure));
    }

    #[test]
    fn concurrent_succeed_on_one() {
        let mut node = Concurrent::new(
            "race",
            vec![slow("slow", 3), leaf("fast", BehaviorResult::Success)],
        )
        .with_policies(FailurePolicy::FailOnAll, SuccessPolicy::SucceedOnOne);
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(node.tick(&mut state), BehaviorResult::Success);
    }

    #[test]
    fn concurrent_mixed_results_without_policy_match_fail() {
        let mut node = Concurrent::new(
            "mixed",
            vec![leaf("ok", BehaviorResult::Success), leaf("no", BehaviorResult::Failure)],
        )
        .with_policies(FailurePolicy::FailOnAll, SuccessPolicy::SucceedOnAll);
        let mut state = BehaviorTreeState::new(TestContext::default());

        assert_eq!(node.tick(&mut state), BehaviorResult::Failure);
    }
}
