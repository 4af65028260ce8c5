use super::error::ClassifierError;
use super::types::ClassificationResult;
use super::ClassifierTransport;
use crate::config::ClassifierConfig;
use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Production transport: POST /predict against the remote classifier.
pub struct HttpTransport {
    client: Client,
    predict_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("PhishWatch/1.0")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            predict_url: format!("{}/predict", config.endpoint.trim_end_matches('/')),
        })
    }
}

#[async_trait::async_trait]
impl ClassifierTransport for HttpTransport {
    async fn predict(&self, url: &str) -> Result<ClassificationResult, ClassifierError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Server {
                status: status.as_u16(),
            });
        }

        response
            .json::<ClassificationResult>()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))
    }
}
