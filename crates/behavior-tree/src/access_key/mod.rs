//! Shared access keys.
//!
//! An access key is a named capability gate that several behavior trees
//! consult to avoid contending on the same resource (a door, a cover point,
//! a weapon slot). Keys are handed out as `Arc<dyn AccessKey>`; each key
//! serializes its own grant/release calls, so unrelated keys never contend.
//!
//! - [`CounterLimitAccessKey`]: at most `max` holders at once
//! - [`TimeLimitAccessKey`]: at most one grant per cooldown interval
//! - [`SharedAccessKeys`]: the named registry trees are bound against

pub mod clock;
pub mod counter_limit;
pub mod registry;
pub mod time_limit;

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter_limit::CounterLimitAccessKey;
pub use registry::SharedAccessKeys;
pub use time_limit::TimeLimitAccessKey;

/// Concrete variant of an access key; doubles as the record tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessKeyKind {
    TimeLimit,
    CounterLimit,
}

/// A named, shared capability gate.
///
/// Grant and release are paired per holder. Granting an exhausted key
/// returns `false`; releasing a key nobody holds is a no-op.
pub trait AccessKey: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> AccessKeyKind;

    /// Whether a grant attempted now would succeed.
    fn is_available(&self) -> bool;

    /// Atomically checks availability and grants the key.
    fn try_grant(&self) -> bool;

    /// Returns a grant obtained from [`try_grant`](AccessKey::try_grant).
    fn release(&self);
}

/// Lookup interface trees are bound against.
///
/// Lookups happen once, when a tree is loaded; the returned handle is kept
/// for the tree's lifetime.
pub trait AccessKeyProvider {
    fn lookup(&self, name: &str) -> Option<Arc<dyn AccessKey>>;
}

/// Key state is plain counters, so a poisoned lock is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
