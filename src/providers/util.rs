use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How many times to repeat a failed request, and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(250),
        }
    }
}

/// Whether a request error is worth repeating. Only connection failures and
/// timeouts are; HTTP and decoding errors would fail the same way again.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// the policy's retries are used up. Total runs are at most `1 + retries`.
pub async fn with_retry<F, Fut, T>(mut operation: F, policy: RetryPolicy) -> reqwest::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = reqwest::Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt > policy.retries || !is_transient(&err) => return Err(err),
            Err(err) => {
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    policy.retries + 1,
                    err
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_connection_errors_are_retried() {
        let attempts = AtomicUsize::new(0);
        let client = reqwest::Client::new();
        let policy = RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(1),
        };

        let result = with_retry(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.get("http://127.0.0.1:1/").send()
            },
            policy,
        )
        .await;

        assert!(result.unwrap_err().is_connect());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_success_is_not_retried() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = with_retry(|| client.get(server.uri()).send(), RetryPolicy::default())
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
}
