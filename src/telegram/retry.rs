//! Bot API retry with exponential backoff.
//!
//! Outbound sends retry transient network failures with 2^n second backoff,
//! capped at one minute. Replies are conversational, so the window is short:
//! a reply that cannot be delivered within a few attempts is dropped and
//! logged rather than queued for an hour.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Maximum retry attempts before giving up.
const MAX_RETRIES: u32 = 5;

/// Maximum backoff duration between attempts.
const MAX_BACKOFF_SECS: u64 = 60;

/// Retry a Bot API operation with exponential backoff.
///
/// Backoff: 2^n seconds (1, 2, 4, 8, 16), capped at `MAX_BACKOFF_SECS`.
///
/// # Arguments
///
/// * `operation` - The async operation to retry (e.g., send_message)
/// * `is_retryable` - Whether an error is transient and worth retrying
///
/// # Returns
///
/// Result of the operation, or the last error after all retries exhausted.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    is_retryable: fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !is_retryable(&err) || attempt >= MAX_RETRIES {
                    return Err(err);
                }

                let backoff_secs = 2u64.pow(attempt).min(MAX_BACKOFF_SECS);
                warn!(
                    "attempt {} failed ({}), retrying in {}s",
                    attempt + 1,
                    err,
                    backoff_secs
                );

                sleep(Duration::from_secs(backoff_secs)).await;
                attempt += 1;
            }
        }
    }
}

/// Determine if a Telegram error is retryable (transient).
///
/// Only network errors retry; API rejections repeat identically.
pub fn is_telegram_error_retryable(err: &crate::telegram::traits::TelegramError) -> bool {
    matches!(err, crate::telegram::traits::TelegramError::Network(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::traits::TelegramError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_retry_succeeds_immediately() {
        let result = retry_with_backoff(
            || async { Ok::<_, TelegramError>(42) },
            is_telegram_error_retryable,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        let attempt = Arc::new(AtomicU32::new(0));
        let attempt_clone = attempt.clone();

        let result = retry_with_backoff(
            move || {
                let attempt = attempt_clone.clone();
                async move {
                    let count = attempt.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(TelegramError::Network("transient".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            },
            is_telegram_error_retryable,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempt.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let attempt = Arc::new(AtomicU32::new(0));
        let attempt_clone = attempt.clone();

        let result = retry_with_backoff(
            move || {
                let attempt = attempt_clone.clone();
                async move {
                    attempt.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(TelegramError::Api("bad request".to_string()))
                }
            },
            is_telegram_error_retryable,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempt.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_stays_under_cap() {
        assert_eq!(2u64.pow(0), 1);
        assert_eq!(2u64.pow(4), 16);
        assert!(2u64.pow(MAX_RETRIES) < MAX_BACKOFF_SECS);
    }

    #[test]
    fn test_is_telegram_error_retryable() {
        assert!(is_telegram_error_retryable(&TelegramError::Network(
            "timeout".to_string()
        )));
        assert!(!is_telegram_error_retryable(&TelegramError::Api(
            "bad request".to_string()
        )));
        assert!(!is_telegram_error_retryable(&TelegramError::Unauthorized));
    }
}
