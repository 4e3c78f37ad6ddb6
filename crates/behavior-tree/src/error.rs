//! Error types surfaced by user handlers.

use thiserror::Error;

/// Failure reported by a decorator admission handler.
///
/// Decorators treat any handler error as a denied admission; the error is
/// logged and never propagates past the decorator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("missing parameter `{0}`")]
    MissingParameter(String),

    #[error("parameter `{name}` has the wrong type, expected {expected}")]
    InvalidParameter { name: String, expected: &'static str },

    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// Non-fatal problem found while building from a record.
///
/// Loaders skip the offending element and keep going; the host decides
/// whether to log or reject the result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    #[error("unrecognized element `{tag}` skipped")]
    UnknownTag { tag: String },

    #[error("duplicate access key `{name}` skipped")]
    DuplicateKey { name: String },

    #[error("access key `{key}` used by `{node}` is not registered")]
    UnresolvedAccessKey { node: String, key: String },

    #[error("no {role} handler `{handler}` registered for `{node}`")]
    MissingHandler {
        node: String,
        role: &'static str,
        handler: String,
    },

    #[error("reference to unknown shared behavior `{name}`")]
    UnknownReference { name: String },

    #[error("decorator `{node}` has {count} children, only the first is used")]
    ExtraChildren { node: String, count: usize },

    #[error("invalid value `{value}` for attribute `{attribute}` of `{node}`")]
    InvalidAttribute {
        node: String,
        attribute: &'static str,
        value: String,
    },
}
