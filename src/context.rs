//! Checkpoint context and logging.
//!
//! [`CheckpointContext`] tells a unit of work (and the hooks around it) which
//! attempt is running. [`Logger`] is the sink for the four lifecycle messages
//! every checkpoint emits: registration, attempt start, attempt failure and
//! success.

use std::fmt;
use std::sync::Arc;

/// Information about the attempt currently being executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointContext {
    /// The name of the checkpoint, if one was configured
    pub name: Option<String>,
    /// The current attempt (0-indexed)
    pub attempt: u32,
    /// The configured retry budget
    pub retries: u32,
}

impl CheckpointContext {
    /// Creates a new CheckpointContext for the first attempt.
    pub fn new(retries: u32) -> Self {
        Self {
            name: None,
            attempt: 0,
            retries,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the attempt number.
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Returns true if no further attempt follows this one.
    pub fn is_last_attempt(&self) -> bool {
        self.attempt >= self.retries
    }

    /// Returns how many attempts are left after this one.
    pub fn remaining(&self) -> u32 {
        self.retries.saturating_sub(self.attempt)
    }
}

/// Structured metadata attached to every lifecycle message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogInfo {
    /// The name of the checkpoint, if one was configured
    pub checkpoint_name: Option<String>,
    /// The attempt the message refers to, absent for registration
    pub attempt: Option<u32>,
    /// The configured retry budget
    pub retries: u32,
}

impl LogInfo {
    /// Creates a new LogInfo.
    pub fn new(retries: u32) -> Self {
        Self {
            checkpoint_name: None,
            attempt: None,
            retries,
        }
    }

    /// Sets the checkpoint name.
    pub fn with_checkpoint_name(mut self, name: impl Into<String>) -> Self {
        self.checkpoint_name = Some(name.into());
        self
    }

    /// Sets the attempt.
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

/// Severity of a lifecycle message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Registration and attempt start
    Debug,
    /// Checkpoint passed
    Info,
    /// Attempt failed with a consumed retry signal
    Warn,
    /// Not emitted by the checkpoint itself; available to custom sinks
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(level)
    }
}

/// Sink for checkpoint lifecycle messages.
pub trait Logger: Send + Sync {
    /// Logs a debug message.
    fn debug(&self, message: &str, info: &LogInfo);
    /// Logs an info message.
    fn info(&self, message: &str, info: &LogInfo);
    /// Logs a warning.
    fn warn(&self, message: &str, info: &LogInfo);
    /// Logs an error.
    fn error(&self, message: &str, info: &LogInfo);

    /// Logs a message at the given level.
    fn log(&self, level: LogLevel, message: &str, info: &LogInfo) {
        match level {
            LogLevel::Debug => self.debug(message, info),
            LogLevel::Info => self.info(message, info),
            LogLevel::Warn => self.warn(message, info),
            LogLevel::Error => self.error(message, info),
        }
    }
}

/// Logger that forwards to `tracing` with the [`LogInfo`] as fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, info: &LogInfo) {
        tracing::debug!(
            checkpoint = info.checkpoint_name.as_deref(),
            attempt = info.attempt,
            retries = info.retries,
            "{}",
            message
        );
    }

    fn info(&self, message: &str, info: &LogInfo) {
        tracing::info!(
            checkpoint = info.checkpoint_name.as_deref(),
            attempt = info.attempt,
            retries = info.retries,
            "{}",
            message
        );
    }

    fn warn(&self, message: &str, info: &LogInfo) {
        tracing::warn!(
            checkpoint = info.checkpoint_name.as_deref(),
            attempt = info.attempt,
            retries = info.retries,
            "{}",
            message
        );
    }

    fn error(&self, message: &str, info: &LogInfo) {
        tracing::error!(
            checkpoint = info.checkpoint_name.as_deref(),
            attempt = info.attempt,
            retries = info.retries,
            "{}",
            message
        );
    }
}

type LogFn = Arc<dyn Fn(&str, &LogInfo) + Send + Sync>;

/// Logger built from one closure per level. See [`custom_logger`].
#[derive(Clone)]
pub struct CustomLogger {
    debug: LogFn,
    info: LogFn,
    warn: LogFn,
    error: LogFn,
}

impl fmt::Debug for CustomLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomLogger").finish_non_exhaustive()
    }
}

impl Logger for CustomLogger {
    fn debug(&self, message: &str, info: &LogInfo) {
        (self.debug)(message, info)
    }

    fn info(&self, message: &str, info: &LogInfo) {
        (self.info)(message, info)
    }

    fn warn(&self, message: &str, info: &LogInfo) {
        (self.warn)(message, info)
    }

    fn error(&self, message: &str, info: &LogInfo) {
        (self.error)(message, info)
    }
}

/// Creates a logger with a separate closure for each level.
pub fn custom_logger<D, I, W, E>(debug: D, info: I, warn: W, error: E) -> CustomLogger
where
    D: Fn(&str, &LogInfo) + Send + Sync + 'static,
    I: Fn(&str, &LogInfo) + Send + Sync + 'static,
    W: Fn(&str, &LogInfo) + Send + Sync + 'static,
    E: Fn(&str, &LogInfo) + Send + Sync + 'static,
{
    CustomLogger {
        debug: Arc::new(debug),
        info: Arc::new(info),
        warn: Arc::new(warn),
        error: Arc::new(error),
    }
}

/// Creates a logger from a single closure that receives the level.
///
/// ```rust
/// use checkpoint_retry::{simple_custom_logger, LogInfo, Logger};
///
/// let logger = simple_custom_logger(|level, message, _info| {
///     println!("[{}] {}", level, message);
/// });
/// logger.info("Checkpoint passed", &LogInfo::new(1));
/// ```
pub fn simple_custom_logger<F>(log: F) -> CustomLogger
where
    F: Fn(LogLevel, &str, &LogInfo) + Send + Sync + 'static,
{
    let log = Arc::new(log);
    let at = |level: LogLevel| -> LogFn {
        let log = Arc::clone(&log);
        Arc::new(move |message: &str, info: &LogInfo| log(level, message, info))
    };
    CustomLogger {
        debug: at(LogLevel::Debug),
        info: at(LogLevel::Info),
        warn: at(LogLevel::Warn),
        error: at(LogLevel::Error),
    }
}

/// Creates the tracing span a checkpoint invocation runs in.
///
/// The `status` field starts empty and is recorded when the invocation
/// settles.
pub fn create_checkpoint_span(name: Option<&str>, retries: u32) -> tracing::Span {
    tracing::debug_span!(
        "checkpoint",
        checkpoint = name,
        retries = retries,
        status = tracing::field::Empty,
    )
}
