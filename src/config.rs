//! Configuration types for checkpoints.
//!
//! [`CheckpointConfig`] carries the retry budget, the addressing name and the
//! optional hooks of one checkpoint. [`CheckpointSettings`] is its
//! serializable subset, for budgets and names that come from a config file.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{CheckpointContext, Logger};
use crate::error::CheckpointResult;

/// Number of retries a checkpoint gets when none is configured.
pub const DEFAULT_RETRIES: u32 = 1;

/// Boxed future returned by checkpoint hooks.
pub type HookFuture<T> = Pin<Box<dyn Future<Output = CheckpointResult<T>> + Send>>;

/// Hook awaited after a matched retry signal, before the next attempt.
pub type OnRetryFn = Arc<dyn Fn(CheckpointContext) -> HookFuture<()> + Send + Sync>;

/// Fallback producer awaited once the retry budget is spent.
pub type OnFailureFn<T> = Arc<dyn Fn(CheckpointContext) -> HookFuture<T> + Send + Sync>;

/// Configuration for one checkpoint.
///
/// `T` is the value the checkpoint produces; it only matters when an
/// `on_failure` fallback is configured, since the fallback must produce the
/// same type as the wrapped work.
///
/// # Example
///
/// ```rust,ignore
/// use checkpoint_retry::{checkpoint, retry, CheckpointConfig};
///
/// let config = CheckpointConfig::new()
///     .with_name("fetch")
///     .with_retries(3)
///     .with_on_retry(|ctx| async move {
///         println!("attempt {} asked for a retry", ctx.attempt);
///         Ok(())
///     })
///     .with_on_failure(|_ctx| async { Ok(String::from("cached")) });
///
/// let body = checkpoint(&config, |_ctx| async { fetch_body().await }).await?;
/// ```
pub struct CheckpointConfig<T = ()> {
    /// Attempts allowed beyond the first.
    pub retries: u32,
    /// Name targeted retry signals address this checkpoint by.
    pub name: Option<String>,
    /// Sink for lifecycle messages.
    pub logger: Option<Arc<dyn Logger>>,
    /// Hook awaited before each re-attempt.
    pub on_retry: Option<OnRetryFn>,
    /// Fallback producer for when all attempts are spent.
    pub on_failure: Option<OnFailureFn<T>>,
}

impl<T> Default for CheckpointConfig<T> {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            name: None,
            logger: None,
            on_retry: None,
            on_failure: None,
        }
    }
}

impl<T> Clone for CheckpointConfig<T> {
    fn clone(&self) -> Self {
        Self {
            retries: self.retries,
            name: self.name.clone(),
            logger: self.logger.clone(),
            on_retry: self.on_retry.clone(),
            on_failure: self.on_failure.clone(),
        }
    }
}

impl<T> fmt::Debug for CheckpointConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointConfig")
            .field("retries", &self.retries)
            .field("name", &self.name)
            .field("logger", &self.logger.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

impl<T> CheckpointConfig<T> {
    /// Creates a config with the default budget and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from serializable settings.
    pub fn from_settings(settings: CheckpointSettings) -> Self {
        Self {
            retries: settings.retries,
            name: settings.name,
            ..Self::default()
        }
    }

    /// Returns the serializable part of this config.
    pub fn settings(&self) -> CheckpointSettings {
        CheckpointSettings {
            retries: self.retries,
            name: self.name.clone(),
        }
    }

    /// Sets the number of attempts allowed beyond the first.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the name targeted retry signals address this checkpoint by.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the lifecycle logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets the hook awaited before each re-attempt.
    ///
    /// The hook receives the context of the attempt that just asked for a
    /// retry. An `Err` from the hook ends the checkpoint with that error.
    pub fn with_on_retry<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(CheckpointContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckpointResult<()>> + Send + 'static,
    {
        self.on_retry = Some(Arc::new(move |ctx: CheckpointContext| -> HookFuture<()> {
            Box::pin(hook(ctx))
        }));
        self
    }

    /// Sets the fallback awaited once the retry budget is spent.
    ///
    /// Whatever the fallback returns becomes the checkpoint's result; an
    /// `Err` is returned as-is and never retried.
    pub fn with_on_failure<F, Fut>(mut self, fallback: F) -> Self
    where
        T: 'static,
        F: Fn(CheckpointContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckpointResult<T>> + Send + 'static,
    {
        self.on_failure = Some(Arc::new(move |ctx: CheckpointContext| -> HookFuture<T> {
            Box::pin(fallback(ctx))
        }));
        self
    }

    /// Builds the context handed to the work and hooks for `attempt`.
    pub fn context(&self, attempt: u32) -> CheckpointContext {
        let ctx = CheckpointContext::new(self.retries).with_attempt(attempt);
        match self.name {
            Some(ref name) => ctx.with_name(name),
            None => ctx,
        }
    }

    /// Runs `work` under this config. Same as [`crate::checkpoint`].
    pub async fn run<F, Fut>(&self, work: F) -> CheckpointResult<T>
    where
        F: FnMut(CheckpointContext) -> Fut,
        Fut: Future<Output = CheckpointResult<T>>,
    {
        crate::handlers::checkpoint(self, work).await
    }
}

/// Serializable checkpoint settings.
///
/// Missing fields take their defaults, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSettings {
    /// Attempts allowed beyond the first.
    pub retries: u32,
    /// Name targeted retry signals address the checkpoint by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TracingLogger;

    #[test]
    fn test_default_config() {
        let config: CheckpointConfig = CheckpointConfig::default();
        assert_eq!(config.retries, 1);
        assert!(config.name.is_none());
        assert!(config.logger.is_none());
        assert!(config.on_retry.is_none());
        assert!(config.on_failure.is_none());
    }

    #[test]
    fn test_builder() {
        let config: CheckpointConfig<u32> = CheckpointConfig::new()
            .with_retries(4)
            .with_name("first")
            .with_logger(Arc::new(TracingLogger))
            .with_on_retry(|_| async { Ok(()) })
            .with_on_failure(|_| async { Ok(0) });

        assert_eq!(config.retries, 4);
        assert_eq!(config.name.as_deref(), Some("first"));
        assert!(config.logger.is_some());
        assert!(config.on_retry.is_some());
        assert!(config.on_failure.is_some());
    }

    #[test]
    fn test_clone_shares_hooks() {
        let config: CheckpointConfig<u32> =
            CheckpointConfig::new().with_on_failure(|_| async { Ok(7) });
        let cloned = config.clone();
        assert!(Arc::ptr_eq(
            config.on_failure.as_ref().unwrap(),
            cloned.on_failure.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_debug_hides_hook_bodies() {
        let config: CheckpointConfig = CheckpointConfig::new().with_name("first");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("retries: 1"));
        assert!(rendered.contains("on_retry: false"));
    }

    #[test]
    fn test_context_for_attempt() {
        let config: CheckpointConfig = CheckpointConfig::new().with_name("first").with_retries(2);
        let ctx = config.context(1);
        assert_eq!(ctx.name.as_deref(), Some("first"));
        assert_eq!(ctx.attempt, 1);
        assert_eq!(ctx.retries, 2);
    }

    #[test]
    fn test_settings_defaults_from_empty_document() {
        let settings: CheckpointSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, CheckpointSettings::default());
        assert_eq!(settings.retries, DEFAULT_RETRIES);
    }

    #[test]
    fn test_settings_round_trip_through_config() {
        let settings: CheckpointSettings =
            serde_json::from_str(r#"{"retries": 5, "name": "outer"}"#).unwrap();
        let config: CheckpointConfig = CheckpointConfig::from_settings(settings.clone());
        assert_eq!(config.retries, 5);
        assert_eq!(config.name.as_deref(), Some("outer"));
        assert_eq!(config.settings(), settings);
    }

    #[test]
    fn test_settings_skip_absent_name() {
        let json = serde_json::to_string(&CheckpointSettings::default()).unwrap();
        assert_eq!(json, r#"{"retries":1}"#);
    }
}
