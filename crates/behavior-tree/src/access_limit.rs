//! Decorators gated by shared access keys.

use std::sync::Arc;

use crate::access_key::AccessKey;
use crate::decorator::{Admission, Decorator, DecoratorKind};
use crate::BehaviorTreeState;

/// Decorator admitting its child only while it holds a grant on an
/// [`AccessKey`].
pub type AccessLimitDecorator<C> = Decorator<C, AccessLimit>;

/// Admission by granting a shared access key.
///
/// A successful grant is released exactly once: when the child completes
/// (with either `Success` or `Failure`) or when the decorator is reset while
/// the child is `Running`. A key that could not be resolved denies every
/// entry.
#[derive(Debug)]
pub struct AccessLimit {
    key_name: String,
    key: Option<Arc<dyn AccessKey>>,
    held: bool,
}

impl AccessLimit {
    pub fn new(key: Arc<dyn AccessKey>) -> Self {
        Self {
            key_name: key.name().to_owned(),
            key: Some(key),
            held: false,
        }
    }

    /// An admission whose key name did not resolve at bind time.
    pub fn unresolved(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            key: None,
            held: false,
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn key(&self) -> Option<&Arc<dyn AccessKey>> {
        self.key.as_ref()
    }

    /// Whether this decorator currently holds a grant.
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl<C> Admission<C> for AccessLimit {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::AccessLimit
    }

    fn admit(&mut self, _state: &BehaviorTreeState<C>) -> bool {
        let Some(key) = self.key.as_ref() else {
            return false;
        };
        // a still-held grant is never stacked on top of
        if self.held {
            return true;
        }
        self.held = key.try_grant();
        self.held
    }

    fn finish(&mut self) {
        if !self.held {
            return;
        }
        if let Some(key) = self.key.as_ref() {
            key.release();
        }
        self.held = false;
    }
}

impl<C> Decorator<C, AccessLimit> {
    /// Creates a decorator gated by `key`.
    pub fn access_limit(name: impl Into<String>, key: Arc<dyn AccessKey>) -> Self {
        Self::with_admission(name, AccessLimit::new(key))
    }
}
