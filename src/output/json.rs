use anyhow::Result;
use serde::Serialize;

use crate::analysis::TranscriptAnalysis;
use crate::input::CallRecord;
use crate::remote::AnalysisOrigin;

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// JSON payload for `analyze --json` and `batch --json`: call metadata,
/// which path produced the analysis, and the analysis itself.
#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope<'a> {
    pub call: CallMeta<'a>,
    pub origin: &'static str,
    pub analysis: &'a TranscriptAnalysis,
}

#[derive(Debug, Serialize)]
pub struct CallMeta<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<&'a str>,
}

impl<'a> AnalysisEnvelope<'a> {
    pub fn new(
        record: &'a CallRecord,
        origin: AnalysisOrigin,
        analysis: &'a TranscriptAnalysis,
    ) -> Self {
        Self {
            call: CallMeta {
                id: &record.id,
                title: &record.title,
                date: &record.date,
                source: &record.source,
                contact: record.contact.as_deref(),
            },
            origin: origin.as_str(),
            analysis,
        }
    }
}
