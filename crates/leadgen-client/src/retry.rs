//! Retry with exponential back-off and jitter for idempotent reads.
//!
//! Only `GET` calls go through [`retry_with_backoff`]. Generation, regeneration
//! and evaluation are not idempotent on the server and are issued exactly once.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** network timeouts and connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** 404, other 4xx, malformed bodies, bad configuration.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::Api { status, .. } => *status == 429 || *status >= 500,
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Un-jittered delay before retry number `retry` (1-based): `base × 2^(retry-1)`,
/// capped at [`MAX_DELAY_MS`].
fn backoff_delay_ms(backoff_base_ms: u64, retry: u32) -> u64 {
    let exponent = retry.saturating_sub(1).min(16);
    backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS)
}

/// Scales `delay_ms` by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn with_jitter(delay_ms: u64) -> Duration {
    let factor = 0.75 + rand::random::<f64>() * 0.5;
    Duration::from_millis((delay_ms as f64 * factor) as u64)
}

/// Runs `operation`, retrying up to `max_retries` times while it fails with a
/// retriable error. Anything else is returned as soon as it happens.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retries < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };

        retries += 1;
        let delay = with_jitter(backoff_delay_ms(backoff_base_ms, retries));
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "dashboard API transient error, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn api_err(status: u16) -> ClientError {
        ClientError::Api {
            status,
            context: "test".to_owned(),
            message: None,
        }
    }

    /// Feeds `retry_with_backoff` one scripted outcome per attempt
    /// (`Some(status)` fails, `None` or past the end succeeds) and returns the
    /// result with the number of attempts made.
    async fn run_script(
        max_retries: u32,
        script: &[Option<u16>],
    ) -> (Result<usize, ClientError>, usize) {
        let attempts = AtomicUsize::new(0);
        let result = retry_with_backoff(max_retries, 0, || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            let outcome = script.get(attempt).copied().flatten();
            async move {
                match outcome {
                    Some(404) => Err(ClientError::NotFound {
                        context: "business".to_owned(),
                    }),
                    Some(status) => Err(api_err(status)),
                    None => Ok(attempt),
                }
            }
        })
        .await;
        (result, attempts.load(Ordering::SeqCst))
    }

    #[test]
    fn transient_statuses_are_retriable() {
        for status in [429, 500, 502, 503] {
            assert!(is_retriable(&api_err(status)), "{status} should be retried");
        }
    }

    #[test]
    fn permanent_failures_are_not_retriable() {
        for status in [400, 401, 403, 422] {
            assert!(!is_retriable(&api_err(status)), "{status} should not be retried");
        }
        assert!(!is_retriable(&ClientError::NotFound {
            context: "business".to_owned()
        }));
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&ClientError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }

    #[test]
    fn delay_doubles_and_is_capped() {
        assert_eq!(backoff_delay_ms(500, 1), 500);
        assert_eq!(backoff_delay_ms(500, 2), 1_000);
        assert_eq!(backoff_delay_ms(500, 3), 2_000);
        assert_eq!(backoff_delay_ms(500, 10), MAX_DELAY_MS);
        assert_eq!(backoff_delay_ms(u64::MAX, 40), MAX_DELAY_MS);
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        for _ in 0..100 {
            let ms = with_jitter(1_000).as_millis();
            assert!((750..1_250).contains(&ms), "{ms} out of range");
        }
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retrying() {
        let (result, attempts) = run_script(3, &[None]).await;
        assert_eq!(result.unwrap(), 0);
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let (result, attempts) = run_script(3, &[Some(502), Some(429), None]).await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn last_error_is_returned_once_retries_run_out() {
        let (result, attempts) = run_script(2, &[Some(500), Some(500), Some(503), None]).await;
        assert!(matches!(result, Err(ClientError::Api { status: 503, .. })));
        assert_eq!(attempts, 3, "1 initial + 2 retries");
    }

    #[tokio::test]
    async fn permanent_failure_stops_immediately() {
        let (result, attempts) = run_script(3, &[Some(404), None]).await;
        assert!(matches!(result, Err(ClientError::NotFound { .. })));
        assert_eq!(attempts, 1);

        let (result, attempts) = run_script(3, &[Some(500), Some(400), None]).await;
        assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let (result, attempts) = run_script(0, &[Some(503), None]).await;
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }
}
