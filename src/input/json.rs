use anyhow::{Context, Result};
use serde::Deserialize;

use crate::input::CallRecord;

/// Call export from the practice-management dashboard. Only the fields we
/// analyze are listed; everything else in the export is ignored.
#[derive(Debug, Deserialize)]
pub struct JsonCall {
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub contact: Option<String>,
    pub source: Option<String>,
    pub transcript: Option<String>,
    // Older exports carried the body as raw_text
    pub raw_text: Option<String>,
}

/// Parse a JSON call export into a CallRecord.
pub fn parse_json(content: &str, default_source: Option<&str>) -> Result<CallRecord> {
    let jc: JsonCall =
        serde_json::from_str(content).context("Failed to parse JSON call export")?;

    let transcript = jc.transcript.or(jc.raw_text).unwrap_or_default();

    Ok(CallRecord {
        id: jc.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        title: jc.title.unwrap_or_else(|| "Sans titre".to_string()),
        date: jc.date.unwrap_or_default(),
        source: jc
            .source
            .or_else(|| default_source.map(|s| s.to_string()))
            .unwrap_or_else(|| "json".to_string()),
        contact: jc.contact,
        transcript: transcript.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_export_is_mapped() {
        let content = r#"{
            "id": "call-457",
            "title": "Appel Mme Martin",
            "date": "2026-03-10T14:30:00Z",
            "contact": "Mme Martin",
            "transcript": "[00:01] Avocat: Bonjour.\n[00:02] Client: Bonjour maitre."
        }"#;
        let record = parse_json(content, None).unwrap();
        assert_eq!(record.id, "call-457");
        assert_eq!(record.title, "Appel Mme Martin");
        assert_eq!(record.contact.as_deref(), Some("Mme Martin"));
        assert_eq!(record.source, "json");
        assert!(record.transcript.starts_with("[00:01]"));
    }

    #[test]
    fn missing_id_gets_a_fresh_uuid() {
        let record = parse_json(r#"{"transcript": "Bonjour."}"#, None).unwrap();
        assert_eq!(record.id.len(), 36);
        assert_eq!(record.title, "Sans titre");
    }

    #[test]
    fn legacy_raw_text_field_is_accepted() {
        let record = parse_json(r#"{"raw_text": "Bonjour maitre."}"#, None).unwrap();
        assert_eq!(record.transcript, "Bonjour maitre.");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let content = r#"{"transcript": "Bonjour.", "durationSeconds": 310, "caseId": "2024-457"}"#;
        let record = parse_json(content, None).unwrap();
        assert_eq!(record.transcript, "Bonjour.");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_json("{not json", None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
