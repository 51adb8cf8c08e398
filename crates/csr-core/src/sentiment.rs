//! Sentiment-analysis client for textual personality answers.
//!
//! The personality session only sees the [`SentimentAnalyzer`] trait; the
//! HTTP implementation lives here. Failures are classified into the two
//! recoverable classes the UI offers retry-or-skip for: the service could
//! not be reached, or it answered with something unusable as a score.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{AnalysisError, ConfigError};
use crate::storage::config::SentimentConfig;

/// Scores a free-text answer. Returns a score in `0..=100`.
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<f64, AnalysisError>;
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "csr";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keyring key holding the service API key, if the deployment uses one.
pub const API_KEY_NAME: &str = "sentiment_api_key";

#[derive(Deserialize)]
struct ScoreResponse {
    score: f64,
}

/// HTTP implementation: POSTs the text as JSON to the configured endpoint
/// and expects `{"score": <0..=100>}` back.
pub struct HttpSentimentAnalyzer {
    endpoint: Url,
    timeout: Duration,
    api_key: Option<String>,
}

impl HttpSentimentAnalyzer {
    /// Build from config; the API key is looked up in the OS keyring
    /// (absent keyring entries mean unauthenticated requests).
    pub fn from_config(cfg: &SentimentConfig) -> Result<Self, ConfigError> {
        let api_key = keyring_store::get(API_KEY_NAME).ok().flatten();
        Self::new(&cfg.endpoint, api_key, Duration::from_secs(cfg.request_timeout_secs))
    }

    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "sentiment.endpoint".into(),
            message: e.to_string(),
        })?;
        Ok(Self {
            endpoint,
            timeout,
            api_key,
        })
    }
}

impl SentimentAnalyzer for HttpSentimentAnalyzer {
    fn analyze(&self, text: &str) -> Result<f64, AnalysisError> {
        let client = reqwest::Client::new();
        let mut request = client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&serde_json::json!({ "text": text }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let resp = tokio::runtime::Handle::current().block_on(request.send())?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(AnalysisError::UnusableResponse(format!("HTTP {status}")));
        }

        let body: ScoreResponse = tokio::runtime::Handle::current()
            .block_on(resp.json())
            .map_err(|e| AnalysisError::UnusableResponse(e.to_string()))?;

        if !body.score.is_finite() || !(0.0..=100.0).contains(&body.score) {
            return Err(AnalysisError::UnusableResponse(format!(
                "score {} outside 0..=100",
                body.score
            )));
        }
        Ok(body.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_endpoint() {
        let err = HttpSentimentAnalyzer::new("not a url", None, Duration::from_secs(1));
        assert!(err.is_err());
    }
}
