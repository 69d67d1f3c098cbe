//! Early-return macro for retry signals.
//!
//! [`retry!`](crate::retry!) is the statement form of [`retry`](crate::retry)
//! and [`retry_at`](crate::retry_at): it returns the signal out of the
//! enclosing function or `async` block, so nothing after it runs.
//!
//! ```rust,ignore
//! use checkpoint_retry::{checkpoint, retry, CheckpointConfig};
//!
//! checkpoint(&CheckpointConfig::new().with_name("order"), |_| async {
//!     let quote = fetch_quote().await?;
//!     if quote.is_stale() {
//!         retry!("order");
//!     }
//!     place_order(quote).await
//! })
//! .await?;
//! ```

/// Returns a retry signal from the enclosing function or `async` block.
///
/// `retry!()` restarts the innermost checkpoint; `retry!(name)` restarts the
/// checkpoint called `name`. The enclosing block must return
/// `Result<_, CheckpointError>`.
#[macro_export]
macro_rules! retry {
    () => {
        return ::std::result::Result::Err($crate::error::CheckpointError::retry())
    };
    ($name:expr $(,)?) => {
        return ::std::result::Result::Err($crate::error::CheckpointError::retry_at($name))
    };
}

#[cfg(test)]
mod tests {
    use crate::error::CheckpointResult;

    fn untargeted(fail: bool) -> CheckpointResult<u8> {
        if fail {
            retry!();
        }
        Ok(1)
    }

    fn targeted(name: &str) -> CheckpointResult<u8> {
        retry!(name.to_string());
    }

    #[test]
    fn test_retry_macro_returns_untargeted_signal() {
        let error = untargeted(true).unwrap_err();
        assert_eq!(error.retry_signal().and_then(|s| s.target()), None);
        assert_eq!(untargeted(false).unwrap(), 1);
    }

    #[test]
    fn test_retry_macro_returns_targeted_signal() {
        let error = targeted("outer").unwrap_err();
        assert_eq!(error.retry_signal().and_then(|s| s.target()), Some("outer"));
    }

    #[tokio::test]
    #[allow(unreachable_code)]
    async fn test_retry_macro_inside_async_block() {
        let work = async {
            retry!("first");
            Ok::<(), crate::error::CheckpointError>(())
        };
        assert!(work.await.unwrap_err().is_retry());
    }
}
