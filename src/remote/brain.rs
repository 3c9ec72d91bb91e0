use serde_json::json;
use std::time::Duration;

use crate::analysis::TranscriptAnalysis;
use crate::remote::{AnalysisProvider, RemoteError};

/// Per-request timeout when the config does not set one. A hung request
/// only delays the local fallback.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connector for the cabinet's brain service, a small HTTP API that runs
/// the model-backed analysis. Speaks the same `TranscriptAnalysis` JSON
/// shape the local ruleset produces.
pub struct BrainConnector {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl BrainConnector {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/analyze", self.base_url.trim_end_matches('/'))
    }
}

impl AnalysisProvider for BrainConnector {
    fn name(&self) -> &str {
        "brain"
    }

    fn analyze(&self, transcript: &str) -> Result<TranscriptAnalysis, RemoteError> {
        let body = json!({ "transcript": transcript, "language": "fr" });
        let resp = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        resp.json::<TranscriptAnalysis>()
            .map_err(|e| RemoteError::Payload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_handles_trailing_slash() {
        let conn = BrainConnector::new("http://localhost:5005/".to_string(), "k".to_string(), 5)
            .unwrap();
        assert_eq!(conn.endpoint(), "http://localhost:5005/analyze");

        let conn = BrainConnector::new("http://localhost:5005".to_string(), "k".to_string(), 5)
            .unwrap();
        assert_eq!(conn.endpoint(), "http://localhost:5005/analyze");
    }
}
