//! # checkpoint-retry
//!
//! Named checkpoints with bounded retries for async Rust.
//!
//! ## Overview
//!
//! A *checkpoint* wraps a unit of work and runs it up to `retries + 1` times.
//! The work asks to be re-run by returning a *retry signal* instead of a
//! value. Signals travel up the call stack in the `Err` arm of
//! [`CheckpointResult`], so a signal raised deep inside nested calls, or
//! inside nested checkpoints, reaches the checkpoint it is addressed to
//! without any state being threaded between attempts.
//!
//! ### Key Features
//!
//! - **Structural addressing**: an untargeted [`retry`] restarts the innermost
//!   checkpoint; [`retry_at`] restarts the checkpoint with that name and
//!   unwinds through every checkpoint in between without spending their
//!   budgets.
//! - **Transparent failures**: only retry signals are intercepted. Application
//!   errors leave the checkpoint untouched and can be downcast back to their
//!   original type.
//! - **Fallbacks**: an `on_failure` producer replaces the exhaustion error
//!   with a value of its own.
//! - **Hooks**: `on_retry` runs before each re-attempt; a [`Logger`] receives
//!   the lifecycle messages.
//! - **Tracing**: every invocation runs in a `checkpoint` span that records
//!   how it settled.
//!
//! ## Getting Started
//!
//! ```rust,ignore
//! use checkpoint_retry::{checkpoint, retry, CheckpointConfig, CheckpointResult};
//!
//! async fn load_profile(user_id: u64) -> CheckpointResult<Profile> {
//!     let config = CheckpointConfig::new().with_retries(3);
//!     checkpoint(&config, |ctx| async move {
//!         match cache::get(user_id).await? {
//!             Some(profile) => Ok(profile),
//!             // Cache was still warming up, try again.
//!             None if !ctx.is_last_attempt() => retry(),
//!             None => Ok(database::get(user_id).await?),
//!         }
//!     })
//!     .await
//! }
//! ```
//!
//! ### Restarting an outer checkpoint
//!
//! ```rust,ignore
//! use checkpoint_retry::{checkpoint, retry_at, CheckpointConfig};
//!
//! let session = CheckpointConfig::new().with_name("session").with_retries(2);
//! checkpoint(&session, |_| async {
//!     let token = authenticate().await?;
//!     checkpoint(&CheckpointConfig::new(), |_| async {
//!         if token_expired(&token) {
//!             // Skips this checkpoint and re-runs the "session" one.
//!             return retry_at("session");
//!         }
//!         upload(&token).await
//!     })
//!     .await
//! })
//! .await?;
//! ```
//!
//! ## Error Handling
//!
//! Everything that can leave a unit of work other than a value is a
//! [`CheckpointError`]:
//!
//! | Variant | Raised by | Intercepted |
//! |---------|-----------|-------------|
//! | `Retry` | [`retry`], [`retry_at`], [`retry!`] | by the nearest matching checkpoint |
//! | `Exhausted` | a checkpoint without fallback that ran out of attempts | never |
//! | `Failure` | application code | never |
//!
//! A `Retry` that reaches the top-level caller names a checkpoint that was
//! not on the stack.
//!
//! ## Module Organization
//!
//! - [`config`]: Checkpoint configuration and serializable settings
//! - [`context`]: Attempt context and lifecycle logging
//! - [`error`]: Error types
//! - [`handlers`]: The checkpoint retry loop
//! - [`signal`]: Retry signals and the functions that raise them

#[macro_use]
mod macros;

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod signal;

// Re-export main types at crate root
pub use config::{
    CheckpointConfig, CheckpointSettings, HookFuture, OnFailureFn, OnRetryFn, DEFAULT_RETRIES,
};
pub use context::{
    create_checkpoint_span, custom_logger, simple_custom_logger, CheckpointContext, CustomLogger,
    LogInfo, LogLevel, Logger, TracingLogger,
};
pub use error::{BoxError, CheckpointError, CheckpointResult, ErrorObject};
pub use handlers::{checkpoint, checkpoint_default, AttemptOutcome};
pub use signal::{retry, retry_at, RetrySignal};
