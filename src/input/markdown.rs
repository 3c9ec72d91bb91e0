use anyhow::Result;
use std::path::Path;

use crate::input::CallRecord;

/// Parse a markdown call note with optional YAML frontmatter.
///
/// Expected format:
/// ```text
/// ---
/// title: Appel Mme Martin
/// date: 2026-03-10
/// contact: Mme Martin
/// ---
///
/// [00:01] Avocat: Bonjour.
/// [00:02] Client: Bonjour maitre.
/// ```
pub fn parse_markdown(
    content: &str,
    filename: &str,
    default_source: Option<&str>,
) -> Result<CallRecord> {
    let (frontmatter, body) = split_frontmatter(content);

    let mut title = title_from_filename(filename);
    let mut date = String::new();
    let mut source = default_source.unwrap_or("markdown").to_string();
    let mut contact: Option<String> = None;

    if let Some(fm) = frontmatter {
        if let Ok(serde_json::Value::Object(obj)) = serde_yaml::from_str(&fm) {
            let field = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(String::from);
            if let Some(v) = field("title") {
                title = v;
            }
            if let Some(v) = field("date") {
                date = v;
            }
            if let Some(v) = field("source") {
                source = v;
            }
            contact = field("contact");
        }
    }

    Ok(CallRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        date,
        source,
        contact,
        transcript: body.trim().to_string(),
    })
}

/// Split a leading `---` fenced YAML block off the body. An unterminated
/// fence is not frontmatter; the whole content stays body.
fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let trimmed = content.trim_start();
    let rest = match trimmed.strip_prefix("---") {
        Some(r) => r,
        None => return (None, content),
    };
    match rest.find("\n---") {
        Some(end) => (Some(rest[..end].trim().to_string()), &rest[end + 4..]),
        None => (None, content),
    }
}

fn title_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .replace(['-', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_fields_override_defaults() {
        let content = "---\ntitle: Appel Mme Martin\ndate: 2026-03-10\ncontact: Mme Martin\n---\n\n[00:01] Avocat: Bonjour.\n";
        let record = parse_markdown(content, "notes.md", None).unwrap();
        assert_eq!(record.title, "Appel Mme Martin");
        assert_eq!(record.date, "2026-03-10");
        assert_eq!(record.contact.as_deref(), Some("Mme Martin"));
        assert_eq!(record.transcript, "[00:01] Avocat: Bonjour.");
    }

    #[test]
    fn no_frontmatter_falls_back_to_filename() {
        let record = parse_markdown("Bonjour maitre.", "appel-du-10-mars.md", None).unwrap();
        assert_eq!(record.title, "appel du 10 mars");
        assert_eq!(record.date, "");
        assert!(record.contact.is_none());
        assert_eq!(record.transcript, "Bonjour maitre.");
    }

    #[test]
    fn unterminated_frontmatter_is_kept_as_body() {
        let content = "---\ntitle: Oops\nBonjour maitre.";
        let record = parse_markdown(content, "a.md", None).unwrap();
        assert_eq!(record.title, "a");
        assert_eq!(record.transcript, content.trim());
    }

    #[test]
    fn unknown_frontmatter_keys_are_ignored() {
        let content = "---\ntitle: Appel\ndossier: 2024-457\n---\nBonjour.";
        let record = parse_markdown(content, "a.md", None).unwrap();
        assert_eq!(record.title, "Appel");
        assert_eq!(record.transcript, "Bonjour.");
    }

    #[test]
    fn frontmatter_split_keeps_body_intact() {
        let (fm, body) = split_frontmatter("---\ntitle: X\n---\nLigne 1\nLigne 2\n");
        assert_eq!(fm.as_deref(), Some("title: X"));
        assert_eq!(body.trim(), "Ligne 1\nLigne 2");
    }
}
