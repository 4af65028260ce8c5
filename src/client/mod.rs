pub mod error;
pub mod http;
pub mod types;

pub use self::error::ClassifierError;
pub use self::http::HttpTransport;
pub use self::types::{ClassificationResult, Prediction, RetryPolicy};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Single-attempt boundary to the remote classifier, for mocking and for
/// switching implementations.
#[async_trait::async_trait]
pub trait ClassifierTransport: Send + Sync {
    async fn predict(&self, url: &str) -> Result<ClassificationResult, ClassifierError>;
}

/// Classifier client that masks transient failures with a bounded retry
/// loop: fixed delay between attempts, transport/HTTP failures only.
#[derive(Clone)]
pub struct RetryingClassifierClient {
    transport: Arc<dyn ClassifierTransport>,
    policy: RetryPolicy,
}

impl RetryingClassifierClient {
    pub fn new(transport: Arc<dyn ClassifierTransport>, policy: RetryPolicy) -> Self {
        // A zero-attempt policy would never issue a request
        debug_assert!(policy.max_attempts >= 1);
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Obtains a classification for `url`, retrying retryable failures up
    /// to `max_attempts` total attempts.
    ///
    /// The retry wait is a suspension point that honours `cancel`: if the
    /// triggering context disappears, the pending retry is abandoned and
    /// `Cancelled` is returned without touching any shared state.
    pub async fn classify(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult, ClassifierError> {
        if url.trim().is_empty() {
            return Err(ClassifierError::InvalidInput);
        }

        let mut attempt: u32 = 0;
        loop {
            match self.transport.predict(url).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        return Err(ClassifierError::ExhaustedRetries {
                            attempts: self.policy.max_attempts,
                            cause: Box::new(e),
                        });
                    }

                    warn!(
                        "Classify attempt {}/{} failed for {}: {}. Retrying in {:?}",
                        attempt, self.policy.max_attempts, url, e, self.policy.retry_delay
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ClassifierError::Cancelled),
                        _ = tokio::time::sleep(self.policy.retry_delay) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Transport scripted to fail `failures` times, then succeed.
    struct ScriptedTransport {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ClassifierTransport for ScriptedTransport {
        async fn predict(&self, _url: &str) -> Result<ClassificationResult, ClassifierError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ClassifierError::Server { status: 500 })
            } else {
                Ok(ClassificationResult {
                    prediction: "Safe".to_string(),
                    confidence: Some(0.99),
                    suspicion_score: Some(1.0),
                    original_url: None,
                    normalized_url: None,
                    safe_browsing: None,
                    whois_info: None,
                })
            }
        }
    }

    fn client(failures: usize, max_attempts: u32) -> (RetryingClassifierClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport {
            failures,
            calls: AtomicUsize::new(0),
        });
        let client = RetryingClassifierClient::new(
            transport.clone(),
            RetryPolicy {
                max_attempts,
                retry_delay: Duration::from_millis(10),
            },
        );
        (client, transport)
    }

    #[tokio::test]
    async fn test_empty_url_rejected_before_network() {
        let (client, transport) = client(0, 3);
        let err = client
            .classify("  ", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fail_twice_then_succeed() {
        let (client, transport) = client(2, 3);
        let result = client
            .classify("https://example.com", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.label(), Prediction::Safe);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_after_exact_attempt_count() {
        let (client, transport) = client(usize::MAX, 3);
        let err = client
            .classify("https://example.com", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ClassifierError::ExhaustedRetries { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*cause, ClassifierError::Server { status: 500 }));
            }
            other => panic!("expected ExhaustedRetries, got {other:?}"),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_never_sleeps() {
        let (client, transport) = client(usize::MAX, 1);
        let start = tokio::time::Instant::now();
        let err = client
            .classify("https://example.com", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ExhaustedRetries { attempts: 1, .. }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_semantic_outcome_is_never_retried() {
        struct UncertainTransport {
            calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl ClassifierTransport for UncertainTransport {
            async fn predict(&self, _url: &str) -> Result<ClassificationResult, ClassifierError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(ClassificationResult {
                    prediction: "Uncertain".to_string(),
                    confidence: Some(0.41),
                    suspicion_score: Some(4.0),
                    original_url: None,
                    normalized_url: None,
                    safe_browsing: None,
                    whois_info: None,
                })
            }
        }

        let transport = Arc::new(UncertainTransport {
            calls: AtomicUsize::new(0),
        });
        let client = RetryingClassifierClient::new(transport.clone(), RetryPolicy::default());

        let result = client
            .classify("https://example.com", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.label(), Prediction::Uncertain);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_is_terminal() {
        struct MalformedTransport {
            calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl ClassifierTransport for MalformedTransport {
            async fn predict(&self, _url: &str) -> Result<ClassificationResult, ClassifierError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(ClassifierError::MalformedResponse("missing field".into()))
            }
        }

        let transport = Arc::new(MalformedTransport {
            calls: AtomicUsize::new(0),
        });
        let client = RetryingClassifierClient::new(transport.clone(), RetryPolicy::default());

        let err = client
            .classify("https://example.com", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancellation_abandons_pending_retry() {
        let transport = Arc::new(ScriptedTransport {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        });
        let client = RetryingClassifierClient::new(
            transport.clone(),
            RetryPolicy {
                max_attempts: 3,
                retry_delay: Duration::from_secs(60),
            },
        );

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel_clone.cancel();
        });

        let err = client
            .classify("https://example.com", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Cancelled));
        // First attempt went out; the retry never did
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
