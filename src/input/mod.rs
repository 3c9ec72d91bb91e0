pub mod json;
pub mod markdown;
pub mod text;

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// One call transcript plus the export metadata around it.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub source: String,
    pub contact: Option<String>,
    pub transcript: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Markdown,
    Text,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "markdown" | "md" => Some(Format::Markdown),
            "text" | "txt" => Some(Format::Text),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Format::Json),
            Some("md" | "markdown") => Some(Format::Markdown),
            Some("txt" | "text") => Some(Format::Text),
            _ => None,
        }
    }
}

/// Guess a format from the content itself: a JSON object starts with `{`,
/// YAML frontmatter starts with `---`, anything else is plain text.
pub fn sniff_format(content: &str) -> Format {
    let trimmed = content.trim();
    if trimmed.starts_with('{') {
        Format::Json
    } else if trimmed.starts_with("---") {
        Format::Markdown
    } else {
        Format::Text
    }
}

/// Read one transcript file into a `CallRecord`.
pub fn read_record(path: &Path, format_override: Option<Format>) -> Result<CallRecord> {
    let format = format_override
        .or_else(|| Format::detect_from_extension(path))
        .with_context(|| format!("Cannot determine format for: {}", path.display()))?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    parse_content(&content, path, format, None)
}

/// Read a transcript from stdin, sniffing the format when none is forced.
pub fn read_stdin(format_override: Option<Format>) -> Result<CallRecord> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    if content.trim().is_empty() {
        bail!("Empty input from stdin");
    }

    let format = format_override.unwrap_or_else(|| sniff_format(&content));
    parse_content(&content, Path::new("stdin"), format, Some("stdin"))
}

/// Expand CLI path arguments into concrete transcript files: plain files
/// as-is, directories recursively (sorted, known extensions only unless a
/// format override is given), anything else treated as a glob pattern.
pub fn collect_paths(paths: &[String], format_override: Option<Format>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            collect_directory(path, format_override, &mut files)?;
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            let matches: Vec<_> = glob::glob(path_str)
                .with_context(|| format!("Invalid path or glob pattern: {path_str}"))?
                .filter_map(|r| r.ok())
                .collect();

            if matches.is_empty() {
                bail!("No files found matching: {path_str}");
            }

            for entry in matches {
                if entry.is_file() {
                    files.push(entry);
                }
            }
        }
    }

    Ok(files)
}

fn collect_directory(
    dir: &Path,
    format_override: Option<Format>,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_directory(&path, format_override, files)?;
        } else if path.is_file()
            && (format_override.is_some() || Format::detect_from_extension(&path).is_some())
        {
            files.push(path);
        }
    }

    Ok(())
}

fn parse_content(
    content: &str,
    path: &Path,
    format: Format,
    default_source: Option<&str>,
) -> Result<CallRecord> {
    match format {
        Format::Json => json::parse_json(content, default_source),
        Format::Markdown => {
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");
            markdown::parse_markdown(content, filename, default_source)
        }
        Format::Text => text::parse_text(content, path, default_source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn format_from_str_accepts_aliases() {
        assert_eq!(Format::from_str("md"), Some(Format::Markdown));
        assert_eq!(Format::from_str("MARKDOWN"), Some(Format::Markdown));
        assert_eq!(Format::from_str("TXT"), Some(Format::Text));
        assert_eq!(Format::from_str("json"), Some(Format::Json));
        assert_eq!(Format::from_str("pdf"), None);
    }

    #[test]
    fn format_detected_from_extension() {
        assert_eq!(
            Format::detect_from_extension(Path::new("appel.md")),
            Some(Format::Markdown)
        );
        assert_eq!(
            Format::detect_from_extension(Path::new("export.json")),
            Some(Format::Json)
        );
        assert_eq!(Format::detect_from_extension(Path::new("notes.doc")), None);
    }

    #[test]
    fn sniffer_distinguishes_the_three_shapes() {
        assert_eq!(sniff_format("{\"transcript\": \"Bonjour\"}"), Format::Json);
        assert_eq!(sniff_format("  \n---\ntitle: Appel\n---\nBonjour"), Format::Markdown);
        assert_eq!(sniff_format("Bonjour maitre."), Format::Text);
    }

    #[test]
    fn directories_are_walked_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: B\n---\ncorps").unwrap();
        fs::write(dir.path().join("a.txt"), "Bonjour").unwrap();
        fs::write(dir.path().join("c.rs"), "fn main() {}").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.json"), "{}").unwrap();

        let files =
            collect_paths(&[dir.path().to_string_lossy().to_string()], None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "d.json"]);
    }

    #[test]
    fn unmatched_pattern_is_an_error() {
        let err = collect_paths(&["/nonexistent/*.transcript-nope".to_string()], None)
            .unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }

    #[test]
    fn read_record_builds_a_text_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appel-mme-martin.txt");
        fs::write(&path, "Bonjour maitre.\n").unwrap();

        let record = read_record(&path, None).unwrap();
        assert_eq!(record.title, "appel mme martin");
        assert_eq!(record.source, "text");
        assert_eq!(record.transcript, "Bonjour maitre.");
        assert!(!record.date.is_empty());
        assert_eq!(record.id.len(), 36);
    }

    #[test]
    fn read_record_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.doc");
        fs::write(&path, "Bonjour").unwrap();

        let err = read_record(&path, None).unwrap_err();
        assert!(err.to_string().contains("Cannot determine format"));
    }
}
