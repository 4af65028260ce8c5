use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed label set produced by the classifier. Labels outside the set map
/// to `Unknown` rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Safe,
    Phishing,
    Uncertain,
    InvalidUrl,
    /// Flagged by an external blocklist (Google Safe Browsing).
    UnsafeBlocklist,
    Unknown,
}

impl Prediction {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Safe" | "Benign" => Prediction::Safe,
            "Phishing" => Prediction::Phishing,
            "Uncertain" => Prediction::Uncertain,
            "Invalid URL" => Prediction::InvalidUrl,
            "Unsafe (Google Safe Browsing)" => Prediction::UnsafeBlocklist,
            _ => Prediction::Unknown,
        }
    }
}

/// One classification outcome from the remote service. Ephemeral: only the
/// suspicion score and timestamp survive into the cache.
///
/// `safe_browsing` and `whois_info` are opaque payloads passed through for
/// display; the core never interprets their structure beyond presence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassificationResult {
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicion_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_browsing: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois_info: Option<serde_json::Value>,
}

impl ClassificationResult {
    pub fn label(&self) -> Prediction {
        Prediction::from_label(&self.prediction)
    }
}

/// Retry behavior for the classifier client: a bounded number of attempts
/// with a fixed wait in between. No backoff, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(5000),
        }
    }
}
