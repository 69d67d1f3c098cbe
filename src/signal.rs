//! Retry signals.
//!
//! A [`RetrySignal`] is the control-flow value a unit of work returns to
//! abandon its current attempt and restart at a checkpoint. It travels up the
//! call stack in the `Err` arm of a [`CheckpointResult`] until a checkpoint
//! whose name matches consumes it.

use std::fmt;

use crate::error::{CheckpointError, CheckpointResult};

/// A request to restart the nearest matching checkpoint.
///
/// An untargeted signal is consumed by the innermost enclosing checkpoint,
/// whatever that checkpoint is called. A targeted signal is consumed only by
/// a checkpoint configured with exactly that name; every other checkpoint
/// passes it through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RetrySignal {
    target: Option<String>,
}

impl RetrySignal {
    /// Creates an untargeted signal.
    pub fn new() -> Self {
        Self { target: None }
    }

    /// Creates a signal addressed to the checkpoint called `name`.
    ///
    /// An empty name is the same as no name at all.
    pub fn targeting(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return Self::new();
        }
        Self { target: Some(name) }
    }

    /// Returns the name of the checkpoint this signal is addressed to.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns true if this signal names a specific checkpoint.
    pub fn is_targeted(&self) -> bool {
        self.target.is_some()
    }

    /// Returns true if a checkpoint configured with `checkpoint_name` consumes
    /// this signal.
    pub fn matches(&self, checkpoint_name: Option<&str>) -> bool {
        match self.target.as_deref() {
            None => true,
            Some(target) => checkpoint_name == Some(target),
        }
    }
}

impl fmt::Display for RetrySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(ref target) => write!(f, "Retry requested for checkpoint '{}'", target),
            None => write!(f, "Retry requested"),
        }
    }
}

/// Abandons the current attempt and restarts the innermost checkpoint.
///
/// Always returns `Err`, so it is meant to be returned (or `?`-ed) straight
/// out of the unit of work:
///
/// ```rust
/// use checkpoint_retry::{retry, CheckpointResult};
///
/// fn fetch(ready: bool) -> CheckpointResult<u32> {
///     if !ready {
///         return retry();
///     }
///     Ok(7)
/// }
///
/// assert!(fetch(false).unwrap_err().is_retry());
/// assert_eq!(fetch(true).unwrap(), 7);
/// ```
pub fn retry<T>() -> CheckpointResult<T> {
    Err(CheckpointError::retry())
}

/// Abandons the current attempt and restarts the checkpoint called `name`,
/// unwinding through any checkpoints in between.
///
/// ```rust
/// use checkpoint_retry::{retry_at, CheckpointResult};
///
/// let result: CheckpointResult<()> = retry_at("outer");
/// let error = result.unwrap_err();
/// assert_eq!(error.retry_signal().and_then(|s| s.target()), Some("outer"));
/// ```
pub fn retry_at<T>(name: impl Into<String>) -> CheckpointResult<T> {
    Err(CheckpointError::retry_at(name))
}
