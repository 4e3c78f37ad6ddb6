//! Cooldown-limited access keys.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{AccessKey, AccessKeyKind, Clock, lock};
use crate::record::Record;

/// Grants at most once per cooldown interval.
///
/// States: available (never granted, or `now - last_grant >= cooldown`) and
/// cooling down. Release is a no-op; the key recovers by itself.
#[derive(Debug)]
pub struct TimeLimitAccessKey {
    name: String,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    last_grant: Mutex<Option<Duration>>,
}

impl TimeLimitAccessKey {
    pub fn new(name: impl Into<String>, cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            cooldown,
            clock,
            last_grant: Mutex::new(None),
        }
    }

    /// Builds a key from a `TimeLimit` record.
    ///
    /// Attributes: `Key` (name) and `TimeInterval` in seconds (defaults to
    /// 1.0). Negative or NaN intervals become zero; intervals too large for
    /// a `Duration`, infinity included, saturate to `Duration::MAX`.
    pub fn load(record: &Record, clock: Arc<dyn Clock>) -> Self {
        let seconds = record.attr_float_or("TimeInterval", 1.0);
        Self::new(record.attr_string_or("Key", ""), cooldown_from_secs(seconds), clock)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn ready(&self, last_grant: Option<Duration>) -> bool {
        match last_grant {
            None => true,
            Some(at) => self.clock.now().saturating_sub(at) >= self.cooldown,
        }
    }
}

fn cooldown_from_secs(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

impl AccessKey for TimeLimitAccessKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccessKeyKind {
        AccessKeyKind::TimeLimit
    }

    fn is_available(&self) -> bool {
        self.ready(*lock(&self.last_grant))
    }

    fn try_grant(&self) -> bool {
        let mut last_grant = lock(&self.last_grant);
        if self.ready(*last_grant) {
            *last_grant = Some(self.clock.now());
            tracing::debug!(key = %self.name, cooldown = ?self.cooldown, "granted");
            true
        } else {
            false
        }
    }

    fn release(&self) {}
}
