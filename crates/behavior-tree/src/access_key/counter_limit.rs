//! Counter-limited access keys.

use std::sync::Mutex;

use super::{AccessKey, AccessKeyKind, lock};
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Usage {
    count: u32,
    max: u32,
}

/// Grants at most `max` concurrent holders.
///
/// The count lives in `[0, max]`: a grant increments it only while it is
/// below `max`, and a release decrements it, stopping at zero.
#[derive(Debug)]
pub struct CounterLimitAccessKey {
    name: String,
    usage: Mutex<Usage>,
}

impl CounterLimitAccessKey {
    pub fn new(name: impl Into<String>, max: u32) -> Self {
        Self {
            name: name.into(),
            usage: Mutex::new(Usage { count: 0, max }),
        }
    }

    /// Builds a key from a `CounterLimit` record.
    ///
    /// Attributes: `Key` (name) and `MaxAccessCount` (defaults to 1,
    /// negative values clamp to 0).
    pub fn load(record: &Record) -> Self {
        let max = record.attr_int_or("MaxAccessCount", 1).clamp(0, u32::MAX.into());
        Self::new(
            record.attr_string_or("Key", ""),
            u32::try_from(max).unwrap_or(u32::MAX),
        )
    }

    /// Number of outstanding grants.
    pub fn count(&self) -> u32 {
        lock(&self.usage).count
    }

    pub fn max(&self) -> u32 {
        lock(&self.usage).max
    }
}

impl AccessKey for CounterLimitAccessKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccessKeyKind {
        AccessKeyKind::CounterLimit
    }

    fn is_available(&self) -> bool {
        let usage = lock(&self.usage);
        usage.count < usage.max
    }

    fn try_grant(&self) -> bool {
        let mut usage = lock(&self.usage);
        if usage.count < usage.max {
            usage.count += 1;
            tracing::debug!(key = %self.name, count = usage.count, max = usage.max, "granted");
            true
        } else {
            false
        }
    }

    fn release(&self) {
        let mut usage = lock(&self.usage);
        if usage.count > 0 {
            usage.count -= 1;
            tracing::debug!(key = %self.name, count = usage.count, "released");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn grants_up_to_max_then_refuses() {
        let key = CounterLimitAccessKey::new("door", 2);

        assert!(key.try_grant());
        assert!(key.try_grant());
        assert!(!key.is_available());
        assert!(!key.try_grant());
        assert_eq!(key.count(), 2);

        key.release();
        assert!(key.try_grant());
    }

    #[test]
    fn release_never_goes_negative() {
        let key = CounterLimitAccessKey::new("door", 1);

        key.release();
        assert_eq!(key.count(), 0);
        assert!(key.try_grant());
        key.release();
        key.release();
        assert_eq!(key.count(), 0);
        assert!(key.try_grant());
    }

    #[test]
    fn zero_max_is_never_available() {
        let key = CounterLimitAccessKey::new("sealed", 0);
        assert!(!key.try_grant());
    }

    #[test]
    fn concurrent_grants_never_exceed_max() {
        let key = Arc::new(CounterLimitAccessKey::new("cover", 3));
        let granted = Arc::new(AtomicU32::new(0));

        std::thread::scope(|scope| {
            for _ in 0..16 {
                let key = Arc::clone(&key);
                let granted = Arc::clone(&granted);
                scope.spawn(move || {
                    if key.try_grant() {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(granted.load(Ordering::SeqCst), 3);
        assert_eq!(key.count(), 3);
    }

    #[test]
    fn load_reads_attributes() {
        let record = Record::new("CounterLimit")
            .with_attr("Key", "weapon_slot")
            .with_attr("MaxAccessCount", 4);
        let key = CounterLimitAccessKey::load(&record);

        assert_eq!(key.name(), "weapon_slot");
        assert_eq!(key.max(), 4);
    }
}
