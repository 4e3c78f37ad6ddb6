//! Named registry of shared access keys.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use super::{
    AccessKey, AccessKeyKind, AccessKeyProvider, Clock, CounterLimitAccessKey, TimeLimitAccessKey,
};
use crate::error::LoadIssue;
use crate::record::Record;

/// Collection name used when a record does not carry one.
pub const DEFAULT_REGISTRY_NAME: &str = "AccessKeys";

/// A named set of access keys shared between behavior trees.
///
/// Trees never reference each other; they coordinate by resolving the same
/// key names against one registry. The registry hands out `Arc` handles, so
/// it can be dropped once every tree has been bound.
#[derive(Debug)]
pub struct SharedAccessKeys {
    name: String,
    keys: Vec<Arc<dyn AccessKey>>,
    index: HashMap<String, usize>,
    issues: Vec<LoadIssue>,
}

impl SharedAccessKeys {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            index: HashMap::new(),
            issues: Vec::new(),
        }
    }

    /// Reconstructs a registry from a key-set record.
    ///
    /// Each child's tag names the concrete key kind (`CounterLimit` or
    /// `TimeLimit`). Children with any other tag are skipped, as are keys
    /// whose name is already taken; both are reported through
    /// [`issues`](Self::issues).
    pub fn load(record: &Record, clock: Arc<dyn Clock>) -> Self {
        let mut registry = Self::new(record.attr_string_or("Name", DEFAULT_REGISTRY_NAME));
        let hint = record.attr_int_or("Count", 0).clamp(0, 1024);
        registry.keys.reserve(usize::try_from(hint).unwrap_or(0));

        for entry in &record.children {
            let key: Arc<dyn AccessKey> = match AccessKeyKind::from_str(&entry.tag) {
                Ok(AccessKeyKind::CounterLimit) => Arc::new(CounterLimitAccessKey::load(entry)),
                Ok(AccessKeyKind::TimeLimit) => {
                    Arc::new(TimeLimitAccessKey::load(entry, Arc::clone(&clock)))
                }
                Err(_) => {
                    registry.issues.push(LoadIssue::UnknownTag {
                        tag: entry.tag.clone(),
                    });
                    continue;
                }
            };
            if !registry.insert(key) {
                let name = entry.attr_string_or("Key", "");
                registry.issues.push(LoadIssue::DuplicateKey { name });
            }
        }
        registry
    }

    /// Adds a key, refusing names already present.
    pub fn insert(&mut self, key: Arc<dyn AccessKey>) -> bool {
        if self.index.contains_key(key.name()) {
            return false;
        }
        self.index.insert(key.name().to_owned(), self.keys.len());
        self.keys.push(key);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AccessKey>> {
        self.index.get(name).map(|&i| &self.keys[i])
    }

    /// Keys in load order.
    pub fn keys(&self) -> impl Iterator<Item = &Arc<dyn AccessKey>> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entries skipped while loading.
    pub fn issues(&self) -> &[LoadIssue] {
        &self.issues
    }
}

impl AccessKeyProvider for SharedAccessKeys {
    fn lookup(&self, name: &str) -> Option<Arc<dyn AccessKey>> {
        self.get(name).cloned()
    }
}
