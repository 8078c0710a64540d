//! Exponential-backoff retry for outbound HTTP requests.

use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Delay before retry number `attempt` (1-based): `initial * 2^(attempt-1)`,
/// capped, plus a little jitter. A numeric `Retry-After` wins, up to 30s.
pub fn retry_delay(attempt: u32, policy: &RetryPolicy, retry_after: Option<&HeaderValue>) -> Duration {
    if let Some(secs) = retry_after
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Duration::from_secs(secs.min(30));
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    let jitter = nanos % (base.min(150) + 1);
    Duration::from_millis(base.saturating_add(jitter))
}

/// Send `request`, retrying on 408/429/5xx and on connect or timeout errors.
/// The last response is returned as-is once attempts run out.
pub async fn send_with_retry(
    request: RequestBuilder,
    policy: &RetryPolicy,
) -> Result<Response, reqwest::Error> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let Some(cloned) = request.try_clone() else {
            return request.send().await;
        };

        match cloned.send().await {
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) && attempt < attempts {
                    let delay = retry_delay(attempt, policy, response.headers().get(RETRY_AFTER));
                    warn!(attempt, attempts, %status, ?delay, "retrying request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Ok(response);
            }
            Err(err) => {
                if (err.is_timeout() || err.is_connect()) && attempt < attempts {
                    let delay = retry_delay(attempt, policy, None);
                    warn!(attempt, attempts, error = %err, ?delay, "retrying request after transport error");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 300,
        };
        let first = retry_delay(1, &policy, None).as_millis();
        let second = retry_delay(2, &policy, None).as_millis();
        let fourth = retry_delay(4, &policy, None).as_millis();
        assert!((100..=200).contains(&first), "{first}");
        assert!((200..=350).contains(&second), "{second}");
        assert!((300..=450).contains(&fourth), "{fourth}");
    }

    #[test]
    fn test_retry_after_header_wins() {
        let policy = RetryPolicy::default();
        let header = HeaderValue::from_static("7");
        assert_eq!(retry_delay(1, &policy, Some(&header)), Duration::from_secs(7));
        let huge = HeaderValue::from_static("600");
        assert_eq!(retry_delay(1, &policy, Some(&huge)), Duration::from_secs(30));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::OK));
    }
}
