//! Fixed-delay retry for upstream requests.
//!
//! Every failure is retried the same way: no backoff, no jitter and no
//! distinction between a 404 and a timeout.

use crate::error::FetchError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Attempt budget and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Attempts actually made; a budget of zero still makes one attempt
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `operation` until it succeeds or the attempt budget is spent.
///
/// Sleeps `policy.delay` between attempts, never after the last one.
pub async fn retry_fixed<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt < attempts => {
                warn!(
                    operation = operation_name,
                    attempt,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %error,
                    "Attempt failed, retrying"
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(
                    operation = operation_name,
                    attempts,
                    error = %error,
                    "Giving up"
                );
                return Err(FetchError::RetriesExhausted {
                    attempts,
                    last: Box::new(error),
                });
            }
        }
    }
}
