//! Error types for checkpoint execution.
//!
//! A single enum carries everything that can travel up out of a unit of
//! work: retry signals (control flow, not failures), exhaustion of a
//! checkpoint's attempt budget, and opaque application failures. Only the
//! first kind is ever intercepted by a checkpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signal::RetrySignal;

/// Boxed application error carried by [`CheckpointError::Failure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by units of work, hooks and checkpoints.
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Everything that can leave a unit of work other than a value.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Retry signal on its way to a matching checkpoint.
    ///
    /// Surfaces to the top-level caller only when no enclosing checkpoint
    /// matched it, which usually means a misspelled checkpoint name.
    #[error("{0}")]
    Retry(RetrySignal),

    /// All attempts were spent and no fallback was configured.
    #[error("Checkpoint failed after {retries} retries")]
    Exhausted {
        /// The retry budget the checkpoint was configured with
        retries: u32,
    },

    /// Application failure, passed through untouched.
    #[error(transparent)]
    Failure(BoxError),
}

impl CheckpointError {
    /// Creates an untargeted retry signal.
    pub fn retry() -> Self {
        Self::Retry(RetrySignal::new())
    }

    /// Creates a retry signal addressed to the checkpoint called `name`.
    pub fn retry_at(name: impl Into<String>) -> Self {
        Self::Retry(RetrySignal::targeting(name))
    }

    /// Creates an exhaustion error for a checkpoint with the given budget.
    pub fn exhausted(retries: u32) -> Self {
        Self::Exhausted { retries }
    }

    /// Wraps an application error.
    pub fn failure(error: impl Into<BoxError>) -> Self {
        Self::Failure(error.into())
    }

    /// Returns true if this is a retry signal.
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    /// Returns true if this is an exhaustion error.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Returns true if this wraps an application error.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the retry signal, if this is one.
    pub fn retry_signal(&self) -> Option<&RetrySignal> {
        match self {
            Self::Retry(signal) => Some(signal),
            _ => None,
        }
    }

    /// Returns the wrapped application error, if any.
    pub fn as_failure(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Failure(error) => Some(error.as_ref()),
            _ => None,
        }
    }

    /// Returns the wrapped application error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.as_failure().and_then(|error| error.downcast_ref::<E>())
    }

    /// Consumes the error and returns the wrapped application error, if any.
    pub fn into_failure(self) -> Option<BoxError> {
        match self {
            Self::Failure(error) => Some(error),
            _ => None,
        }
    }
}

/// Serializable report of a [`CheckpointError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// The error type/name
    #[serde(rename = "ErrorType")]
    pub error_type: String,
    /// The error message
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
}

impl ErrorObject {
    /// Creates a new ErrorObject.
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            error_message: error_message.into(),
        }
    }
}

impl From<&CheckpointError> for ErrorObject {
    fn from(error: &CheckpointError) -> Self {
        match error {
            CheckpointError::Retry(signal) => ErrorObject::new("RetrySignal", signal.to_string()),
            CheckpointError::Exhausted { .. } => {
                ErrorObject::new("CheckpointExhausted", error.to_string())
            }
            CheckpointError::Failure(inner) => ErrorObject::new("UserCodeError", inner.to_string()),
        }
    }
}

impl From<RetrySignal> for CheckpointError {
    fn from(signal: RetrySignal) -> Self {
        Self::Retry(signal)
    }
}

// Application errors commonly raised inside units of work

impl From<BoxError> for CheckpointError {
    fn from(error: BoxError) -> Self {
        Self::Failure(error)
    }
}

impl From<std::io::Error> for CheckpointError {
    fn from(error: std::io::Error) -> Self {
        Self::Failure(Box::new(error))
    }
}

impl From<serde_json::Error> for CheckpointError {
    fn from(error: serde_json::Error) -> Self {
        Self::Failure(Box::new(error))
    }
}

impl From<String> for CheckpointError {
    fn from(message: String) -> Self {
        Self::Failure(message.into())
    }
}

impl From<&str> for CheckpointError {
    fn from(message: &str) -> Self {
        Self::Failure(message.into())
    }
}
