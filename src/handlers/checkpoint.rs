//! Checkpoint handler.
//!
//! This module implements the bounded retry loop behind [`checkpoint`]:
//! run the work, consume retry signals addressed to this checkpoint, pass
//! everything else through untouched, and turn exhaustion into either the
//! configured fallback or [`CheckpointError::Exhausted`].

use std::future::Future;

use tracing::Instrument;

use crate::config::CheckpointConfig;
use crate::context::{create_checkpoint_span, CheckpointContext, LogInfo, LogLevel, Logger};
use crate::error::{CheckpointError, CheckpointResult};
use crate::signal::RetrySignal;

/// How a single attempt settled, from the point of view of one checkpoint.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// The work produced a value.
    Succeeded(T),
    /// The work raised a retry signal this checkpoint consumes.
    Retrying(RetrySignal),
    /// The work raised something this checkpoint does not handle.
    Propagating(CheckpointError),
}

impl<T> AttemptOutcome<T> {
    /// Classifies the result of one attempt for a checkpoint called
    /// `checkpoint_name`.
    pub fn classify(result: CheckpointResult<T>, checkpoint_name: Option<&str>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(CheckpointError::Retry(signal)) if signal.matches(checkpoint_name) => {
                Self::Retrying(signal)
            }
            Err(error) => Self::Propagating(error),
        }
    }
}

/// Runs `work` under a bounded retry loop.
///
/// The work is invoked at most `config.retries + 1` times, each time with a
/// fresh [`CheckpointContext`]. After each invocation:
///
/// - `Ok(value)` ends the checkpoint with that value.
/// - A retry signal that is untargeted, or targeted at `config.name`, is
///   consumed: `on_retry` is awaited and the next attempt starts.
/// - Anything else (a signal for another checkpoint, an exhaustion error
///   from a nested checkpoint, an application failure) is returned
///   unchanged without touching the attempt budget or any hook.
///
/// Once every attempt asked for a retry, `on_failure` is awaited and its
/// result returned; without one the checkpoint fails with
/// [`CheckpointError::Exhausted`].
///
/// # Example
///
/// ```rust,ignore
/// use checkpoint_retry::{checkpoint, retry_at, CheckpointConfig};
///
/// let outer = CheckpointConfig::new().with_name("session").with_retries(2);
/// checkpoint(&outer, |_| async {
///     let token = login().await?;
///     checkpoint(&CheckpointConfig::new(), |_| async {
///         match upload(&token).await {
///             Err(UploadError::Expired) => retry_at("session"),
///             other => Ok(other?),
///         }
///     })
///     .await
/// })
/// .await?;
/// ```
pub async fn checkpoint<T, F, Fut>(config: &CheckpointConfig<T>, work: F) -> CheckpointResult<T>
where
    F: FnMut(CheckpointContext) -> Fut,
    Fut: Future<Output = CheckpointResult<T>>,
{
    let span = create_checkpoint_span(config.name.as_deref(), config.retries);
    execute_checkpoint(config, work).instrument(span).await
}

/// Runs `work` under a checkpoint with the default configuration: one retry,
/// no name, no hooks.
pub async fn checkpoint_default<T, F, Fut>(work: F) -> CheckpointResult<T>
where
    F: FnMut(CheckpointContext) -> Fut,
    Fut: Future<Output = CheckpointResult<T>>,
{
    checkpoint(&CheckpointConfig::default(), work).await
}

async fn execute_checkpoint<T, F, Fut>(
    config: &CheckpointConfig<T>,
    mut work: F,
) -> CheckpointResult<T>
where
    F: FnMut(CheckpointContext) -> Fut,
    Fut: Future<Output = CheckpointResult<T>>,
{
    let logger = config.logger.as_deref();
    let mut log_info = LogInfo::new(config.retries);
    if let Some(ref name) = config.name {
        log_info = log_info.with_checkpoint_name(name);
    }

    lifecycle(logger, LogLevel::Debug, "Checkpoint registered", &log_info);

    for attempt in 0..=config.retries {
        let attempt_info = log_info.clone().with_attempt(attempt);
        let ctx = config.context(attempt);

        lifecycle(
            logger,
            LogLevel::Debug,
            &format!("Try number i: {}", attempt),
            &attempt_info,
        );

        match AttemptOutcome::classify(work(ctx.clone()).await, config.name.as_deref()) {
            AttemptOutcome::Succeeded(value) => {
                lifecycle(logger, LogLevel::Info, "Checkpoint passed", &attempt_info);
                return settle("succeeded", Ok(value));
            }
            AttemptOutcome::Retrying(signal) => {
                tracing::debug!(attempt, signal_target = signal.target(), "Retry signal consumed");
                lifecycle(
                    logger,
                    LogLevel::Warn,
                    &format!("Try number i: {} failed", attempt),
                    &attempt_info,
                );
                if let Some(ref on_retry) = config.on_retry {
                    if let Err(error) = on_retry(ctx).await {
                        return settle("propagated", Err(error));
                    }
                }
            }
            AttemptOutcome::Propagating(error) => {
                if let Some(signal) = error.retry_signal() {
                    tracing::trace!(
                        attempt,
                        signal_target = signal.target(),
                        "Retry signal addressed elsewhere, passing it up"
                    );
                }
                return settle("propagated", Err(error));
            }
        }
    }

    match config.on_failure {
        Some(ref on_failure) => {
            tracing::debug!(retries = config.retries, "Checkpoint exhausted, running fallback");
            settle("fallback", on_failure(config.context(config.retries)).await)
        }
        None => settle("exhausted", Err(CheckpointError::exhausted(config.retries))),
    }
}

/// Forwards a lifecycle message to the configured logger, if any.
fn lifecycle(logger: Option<&dyn Logger>, level: LogLevel, message: &str, info: &LogInfo) {
    if let Some(logger) = logger {
        logger.log(level, message, info);
    }
}

/// Records the final status on the checkpoint span.
fn settle<T>(status: &'static str, result: CheckpointResult<T>) -> CheckpointResult<T> {
    tracing::Span::current().record("status", status);
    result
}
