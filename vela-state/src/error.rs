//! Error types for state access

use std::time::Duration;

use thiserror::Error;

use crate::document::SUPPORTED_VERSIONS;

/// Errors that can occur while resolving a state reference
///
/// All variants carry owned messages so the error can be cloned; a failed
/// `StateReference` stores its error and re-surfaces it on every later read.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    /// Invalid backend configuration (caller's fault, never retried)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The state file, object, or workspace does not exist
    #[error("State not found: {0}")]
    NotFound(String),

    /// Credentials were rejected by the backend
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure talking to a remote backend
    #[error("Network error: {0}")]
    Network(String),

    /// Filesystem or byte-stream failure
    #[error("I/O error: {0}")]
    Io(String),

    /// The state document is not valid JSON or is structurally broken
    #[error("Invalid state document: {0}")]
    Format(String),

    /// The state document declares a format version this crate cannot read
    #[error("Unsupported state file version {found} (supported: {supported:?})")]
    UnsupportedVersion {
        found: u64,
        supported: &'static [u64],
    },

    /// The requested output name is absent from the state
    #[error("Output not found: {0}")]
    OutputNotFound(String),

    /// The caller-supplied fetch deadline elapsed
    #[error("State fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl StateError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unsupported-version error against the supported set
    pub fn unsupported_version(found: u64) -> Self {
        Self::UnsupportedVersion {
            found,
            supported: SUPPORTED_VERSIONS,
        }
    }

    /// Whether a fetch that failed with this error may be retried
    ///
    /// Only transient transport failures qualify; authorization and
    /// not-found responses are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Io(_))
    }
}

/// Result type for state access operations
pub type StateResult<T> = Result<T, StateError>;
