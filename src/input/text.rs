use anyhow::Result;
use std::path::Path;

use crate::input::CallRecord;

/// Parse a plain text file: the whole content is the transcript, title
/// from the file stem, date from the file's mtime.
pub fn parse_text(
    content: &str,
    filepath: &Path,
    default_source: Option<&str>,
) -> Result<CallRecord> {
    let title = filepath
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sans titre")
        .replace(['-', '_'], " ");

    let date = std::fs::metadata(filepath)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(|t| {
            let dt: chrono::DateTime<chrono::Utc> = t.into();
            dt.to_rfc3339()
        })
        .unwrap_or_default();

    Ok(CallRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        date,
        source: default_source.unwrap_or("text").to_string(),
        contact: None,
        transcript: content.trim().to_string(),
    })
}
