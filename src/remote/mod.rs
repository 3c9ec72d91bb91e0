pub mod brain;

use thiserror::Error;
use tracing::warn;

use crate::analysis::{self, TranscriptAnalysis};
use crate::config::RemoteConfig;

/// Which path produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOrigin {
    Remote,
    Local,
}

impl AnalysisOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisOrigin::Remote => "remote",
            AnalysisOrigin::Local => "local",
        }
    }
}

/// Failure modes of a remote analysis call. All of them are recoverable:
/// the caller falls back to the local ruleset.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unusable response payload: {0}")]
    Payload(String),
}

/// Trait that all analysis providers implement.
pub trait AnalysisProvider {
    /// Provider name (used in fallback warnings).
    fn name(&self) -> &str;

    /// Analyze one transcript remotely.
    fn analyze(&self, transcript: &str) -> Result<TranscriptAnalysis, RemoteError>;
}

/// Analyze a transcript, preferring the remote provider when one is
/// configured and reachable.
///
/// This never fails: any provider error is logged and the local ruleset
/// takes over, so a dead brain service degrades the analysis quality,
/// not the command.
pub fn analyze_with_fallback(
    provider: Option<&dyn AnalysisProvider>,
    transcript: &str,
) -> (TranscriptAnalysis, AnalysisOrigin) {
    if let Some(p) = provider {
        match p.analyze(transcript) {
            Ok(result) => return (result, AnalysisOrigin::Remote),
            Err(e) => {
                warn!("Remote analysis via {} failed, using local rules: {}", p.name(), e);
            }
        }
    }

    (analysis::analyze(transcript), AnalysisOrigin::Local)
}

/// Build the provider described by the `[remote]` config section and a
/// resolved API key.
pub fn build_provider(
    cfg: &RemoteConfig,
    api_key: String,
) -> Result<Box<dyn AnalysisProvider>, RemoteError> {
    let timeout = cfg.timeout_secs.unwrap_or(brain::DEFAULT_TIMEOUT_SECS);
    let connector = brain::BrainConnector::new(cfg.base_url.clone(), api_key, timeout)?;
    Ok(Box::new(connector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    struct Canned(TranscriptAnalysis);

    impl AnalysisProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn analyze(&self, _transcript: &str) -> Result<TranscriptAnalysis, RemoteError> {
            Ok(self.0.clone())
        }
    }

    struct AlwaysDown;

    impl AnalysisProvider for AlwaysDown {
        fn name(&self) -> &str {
            "down"
        }

        fn analyze(&self, _transcript: &str) -> Result<TranscriptAnalysis, RemoteError> {
            Err(RemoteError::Payload("connection refused".to_string()))
        }
    }

    #[test]
    fn no_provider_runs_local_rules() {
        let t = "Il faut envoyer le contrat de bail.";
        let (result, origin) = analyze_with_fallback(None, t);
        assert_eq!(origin, AnalysisOrigin::Local);
        assert_eq!(result, analyze(t));
    }

    #[test]
    fn provider_failure_falls_back_to_local_rules() {
        let t = "Le loyer est en retard depuis deux mois.";
        let (result, origin) = analyze_with_fallback(Some(&AlwaysDown), t);
        assert_eq!(origin, AnalysisOrigin::Local);
        assert_eq!(result, analyze(t));
        assert!(result.topics.contains(&"Droit immobilier".to_string()));
    }

    #[test]
    fn provider_result_is_passed_through() {
        let canned = Canned(analyze("Merci beaucoup, d'accord pour demain."));
        let (result, origin) = analyze_with_fallback(Some(&canned), "ignored");
        assert_eq!(origin, AnalysisOrigin::Remote);
        assert_eq!(result, canned.0);
    }
}
