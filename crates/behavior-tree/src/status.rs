//! Results returned by behavior nodes.

/// The result of ticking a behavior node.
///
/// Nodes cache the last result they produced as `Option<BehaviorResult>`:
/// `None` means the node has not been ticked since construction (or since it
/// was reset), which keeps "not yet run" apart from "ran and failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorResult {
    /// The behavior completed successfully.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: the condition was not met.
    /// For decorators: admission was denied (unless laundered by `never_fail`).
    Failure,

    /// The behavior's work spans multiple ticks.
    ///
    /// The parent resumes this node on the next tick instead of restarting
    /// its siblings or re-evaluating admission.
    Running,
}

impl BehaviorResult {
    /// Returns `true` if this result is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, BehaviorResult::Success)
    }

    /// Returns `true` if this result is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, BehaviorResult::Failure)
    }

    /// Returns `true` if this result is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, BehaviorResult::Running)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_complete(self) -> bool {
        !self.is_running()
    }

    /// Turns `Failure` into `Success`, leaving the other results untouched.
    #[inline]
    pub fn launder(self) -> Self {
        match self {
            BehaviorResult::Failure => BehaviorResult::Success,
            other => other,
        }
    }

    /// Maps a predicate outcome onto `Success` / `Failure`.
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value {
            BehaviorResult::Success
        } else {
            BehaviorResult::Failure
        }
    }
}

/// Returns `true` if a cached result says the node is mid-execution.
#[inline]
pub(crate) fn was_running(result: Option<BehaviorResult>) -> bool {
    matches!(result, Some(BehaviorResult::Running))
}
