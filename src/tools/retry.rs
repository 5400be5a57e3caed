//! Retries for the provider HTTP calls
//!
//! A request gets one attempt plus `max_retries` more. Only transient
//! failures (timeouts, dropped connections, 429 and 5xx) are retried; the
//! wait doubles per attempt, is capped and carries up to ±25% jitter.

use crate::errors::{AgentError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Extra attempts when the config does not say otherwise
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Exponential backoff schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub initial: Duration,
    pub ceiling: Duration,
    /// Fraction of the delay randomly added or removed (0.0 disables)
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            ceiling: Duration::from_secs(8),
            jitter: 0.25,
        }
    }
}

impl Backoff {
    /// Wait before retry number `retry` (1-based)
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let base = self.initial.saturating_mul(factor).min(self.ceiling);
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = (rand::random::<f64>() * 2.0 - 1.0) * self.jitter;
        base.mul_f64((1.0 + spread).max(0.0))
    }
}

#[derive(Debug, Clone)]
pub struct RetryManager {
    max_retries: u32,
    backoff: Backoff,
}

impl Default for RetryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryManager {
    pub fn new(max_retries: u32) -> Self {
        Self::with_backoff(max_retries, Backoff::default())
    }

    pub fn with_backoff(max_retries: u32, backoff: Backoff) -> Self {
        Self { max_retries, backoff }
    }

    /// Run `request` until it succeeds, fails permanently or runs out of
    /// attempts. The last error is returned unchanged.
    pub async fn run<F, Fut, T>(&self, endpoint: &str, mut request: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retries >= self.max_retries || !is_transient(&err) {
                return Err(err);
            }

            retries += 1;
            let wait = self.backoff.delay(retries);
            warn!(
                "{} failed ({}); retry {}/{} in {}ms",
                endpoint,
                err,
                retries,
                self.max_retries,
                wait.as_millis()
            );
            sleep(wait).await;
        }
    }
}

/// Whether a failed request is worth sending again
pub fn is_transient(error: &AgentError) -> bool {
    match error {
        AgentError::Timeout { .. } => true,
        AgentError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        AgentError::LlmApiError { status: Some(code), .. } => *code == 429 || *code >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn status(code: u16) -> AgentError {
        AgentError::LlmApiError {
            status: Some(code),
            message: format!("HTTP {}", code),
        }
    }

    fn quick(max_retries: u32) -> RetryManager {
        RetryManager::with_backoff(
            max_retries,
            Backoff {
                initial: Duration::from_millis(1),
                ceiling: Duration::from_millis(2),
                jitter: 0.0,
            },
        )
    }

    /// Fails with `error` for the first `failures` calls, then returns the call count
    async fn flaky(
        retry: &RetryManager,
        failures: usize,
        error: fn() -> AgentError,
    ) -> (Result<usize>, usize) {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = retry
            .run("test", || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(error())
                } else {
                    Ok(n)
                }
            })
            .await;
        (result, counter.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_first_success_is_not_retried() {
        let (result, calls) = flaky(&quick(2), 0, || status(503)).await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_recovers_from_server_errors() {
        let (result, calls) = flaky(&quick(2), 2, || status(502)).await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let (result, calls) = flaky(&quick(2), 10, || status(429)).await;
        assert!(matches!(result, Err(AgentError::LlmApiError { status: Some(429), .. })));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_client_errors_fail_fast() {
        let (result, calls) = flaky(&quick(5), 10, || status(401)).await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&AgentError::Timeout { duration_ms: 10 }));
        assert!(is_transient(&status(500)));
        assert!(!is_transient(&status(400)));
        assert!(!is_transient(&AgentError::api("bad response")));
        assert!(!is_transient(&AgentError::EmptyIndex));
    }

    #[test]
    fn test_backoff_doubles_up_to_ceiling() {
        let backoff = Backoff {
            jitter: 0.0,
            ..Backoff::default()
        };
        assert_eq!(backoff.delay(1), Duration::from_millis(500));
        assert_eq!(backoff.delay(2), Duration::from_millis(1000));
        assert_eq!(backoff.delay(10), Duration::from_secs(8));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let backoff = Backoff::default();
        for _ in 0..50 {
            let d = backoff.delay(1);
            assert!(d >= Duration::from_millis(375) && d <= Duration::from_millis(625));
        }
    }
}
