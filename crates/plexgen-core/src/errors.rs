//! Structured error types shared across plexgen crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PlexError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for network generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PlexError {
    /// The degree sequence cannot be realized (odd stub count) or has the wrong shape.
    #[error("degree sequence error: {0}")]
    DegreeSequence(ErrorInfo),
    /// Layers of a multiplex degree input disagree on their node count.
    #[error("layer mismatch error: {0}")]
    LayerMismatch(ErrorInfo),
    /// The requested number of aspects is not supported.
    #[error("unsupported aspect error: {0}")]
    UnsupportedAspect(ErrorInfo),
    /// A rejection-sampling rewire ran out of its retry budget.
    #[error("rewire exhaustion error: {0}")]
    RewireExhaustion(ErrorInfo),
    /// Structural errors raised by the network collaborators.
    #[error("network error: {0}")]
    Network(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PlexError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PlexError::DegreeSequence(info)
            | PlexError::LayerMismatch(info)
            | PlexError::UnsupportedAspect(info)
            | PlexError::RewireExhaustion(info)
            | PlexError::Network(info)
            | PlexError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Adds a context entry to the payload, keeping the family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let info = match &mut self {
            PlexError::DegreeSequence(info)
            | PlexError::LayerMismatch(info)
            | PlexError::UnsupportedAspect(info)
            | PlexError::RewireExhaustion(info)
            | PlexError::Network(info)
            | PlexError::Serde(info) => info,
        };
        info.context.insert(key.into(), value.to_string());
        self
    }
}
