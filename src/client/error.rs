use thiserror::Error;

/// Failure taxonomy for a single `classify` call. Every variant is
/// terminal to that call; nothing is swallowed silently.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Caller precondition: URL missing or empty. Never retried.
    #[error("no URL provided")]
    InvalidInput,

    /// Network-level failure (DNS, connection reset, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the classifier.
    #[error("classifier returned HTTP {status}")]
    Server { status: u16 },

    /// Response did not parse or is missing a required field. Not retried:
    /// a 2xx body that cannot be read is a contract break, not a blip.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),

    /// All attempts failed; wraps the last transport/server error.
    #[error("classification failed after {attempts} attempts: {cause}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        cause: Box<ClassifierError>,
    },

    /// The triggering context went away while a retry was pending.
    #[error("check cancelled")]
    Cancelled,
}

impl ClassifierError {
    /// Only transport and HTTP failures are retryable. Semantic outcomes
    /// (uncertain verdicts, malformed bodies) are surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClassifierError::Transport(_) | ClassifierError::Server { .. }
        )
    }

    /// Attempt count if this is a retries-exhausted failure.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ClassifierError::ExhaustedRetries { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
