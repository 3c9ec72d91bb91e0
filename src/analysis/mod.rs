pub mod rules;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse classification of a call's emotional register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Cooperative,
    Neutral,
    Tense,
    Hostile,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Cooperative => "cooperative",
            Tone::Neutral => "neutral",
            Tone::Tense => "tense",
            Tone::Hostile => "hostile",
        }
    }
}

/// One attributed utterance in the reconstructed conversation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerSegment {
    pub speaker: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// Structured analysis of one call transcript.
///
/// Serializes to the same camelCase JSON shape the brain service returns,
/// so callers never need to know which path produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptAnalysis {
    pub tone: Tone,
    pub topics: Vec<String>,
    pub action_items: Vec<String>,
    pub summary: String,
    pub speaker_segments: Vec<SpeakerSegment>,
}

const MAX_MATCHES_PER_RULE: usize = 3;
const MIN_ACTION_CHARS: usize = 10;
const MAX_ACTION_CHARS: usize = 200;
const SUMMARY_SENTENCES: usize = 3;
const MIN_SUMMARY_FRAGMENT_CHARS: usize = 20;
const MAX_SEGMENTS: usize = 20;
const MAX_FALLBACK_SEGMENTS: usize = 10;
const MIN_SEGMENT_TEXT_CHARS: usize = 5;
const MIN_UNSTRUCTURED_CHARS: usize = 20;

/// Analyze a raw call transcript with the local ruleset.
///
/// Total function: any input string yields a well-formed analysis, and
/// degenerate input degrades to defaults (the fallback topic, the
/// placeholder summary) instead of erroring. Deterministic and
/// side-effect free: two calls with the same input return the same
/// value.
pub fn analyze(transcript: &str) -> TranscriptAnalysis {
    let lowered = transcript.to_lowercase();

    TranscriptAnalysis {
        tone: classify_tone(&lowered),
        topics: extract_topics(&lowered),
        action_items: extract_action_items(transcript),
        summary: summarize(transcript),
        speaker_segments: parse_speaker_segments(transcript),
    }
}

/// Count distinct phrase hits per tone set; most severe set past the
/// threshold wins (hostile > tense > cooperative > neutral).
fn classify_tone(lowered: &str) -> Tone {
    let hits = |phrases: &[&str]| phrases.iter().filter(|p| lowered.contains(*p)).count();

    if hits(rules::HOSTILE_PHRASES) >= rules::TONE_SIGNAL_THRESHOLD {
        Tone::Hostile
    } else if hits(rules::TENSE_PHRASES) >= rules::TONE_SIGNAL_THRESHOLD {
        Tone::Tense
    } else if hits(rules::COOPERATIVE_PHRASES) >= rules::TONE_SIGNAL_THRESHOLD {
        Tone::Cooperative
    } else {
        Tone::Neutral
    }
}

/// Every taxonomy entry with at least one trigger present, in taxonomy
/// order. Presence only, no scoring.
fn extract_topics(lowered: &str) -> Vec<String> {
    let mut topics: Vec<String> = rules::TOPIC_TAXONOMY
        .iter()
        .filter(|topic| topic.triggers.iter().any(|t| lowered.contains(t)))
        .map(|topic| topic.label.to_string())
        .collect();

    if topics.is_empty() {
        topics.push(rules::FALLBACK_TOPIC.to_string());
    }
    topics
}

fn extract_action_items(transcript: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for rule in rules::ACTION_RULES {
        let re = Regex::new(rule.pattern).unwrap();
        for m in re.find_iter(transcript).take(MAX_MATCHES_PER_RULE) {
            let item = capitalize_first(m.as_str().trim());
            let chars = item.chars().count();
            if chars > MIN_ACTION_CHARS && chars < MAX_ACTION_CHARS && !items.contains(&item) {
                items.push(item);
            }
        }
    }

    items
}

/// First few sentences long enough to carry meaning, stitched back
/// together. Falls back to a fixed placeholder for very short input.
fn summarize(transcript: &str) -> String {
    let splitter = Regex::new(r"[.!?]+").unwrap();
    let sentences: Vec<&str> = splitter
        .split(transcript)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SUMMARY_FRAGMENT_CHARS)
        .take(SUMMARY_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return rules::SUMMARY_PLACEHOLDER.to_string();
    }
    format!("{}.", sentences.join(". "))
}

/// Rebuild the conversation timeline from speaker markers.
///
/// A marker is an optional `[HH:MM]`/`[HH:MM:SS]` timestamp followed by
/// an optional role label. Role labels only match as whole words, so
/// longer words built on them ("Avocate", "Clients") are ordinary text.
/// After a timestamp the label may be separated by `:`/`-` or plain
/// whitespace; a bare label only counts with an explicit `:` or `-`.
/// The current speaker persists across unlabeled fragments until a new
/// label appears.
fn parse_speaker_segments(transcript: &str) -> Vec<SpeakerSegment> {
    let marker_re = Regex::new(&format!(
        r"(?i)(?:\[(\d{{1,2}}:\d{{2}}(?::\d{{2}})?)\]\s*(?:({roles})\b\s*[:\-]?\s*)?|({roles})\b\s*[:\-]\s*)",
        roles = rules::SPEAKER_ROLE_PATTERN
    ))
    .unwrap();

    // Collect marker spans first, then slice the utterance text between
    // consecutive markers.
    let mut markers: Vec<(usize, usize, Option<String>, Option<String>)> = Vec::new();
    for cap in marker_re.captures_iter(transcript) {
        let span = cap.get(0).unwrap();
        let start_time = cap.get(1).map(|m| m.as_str().to_string());
        let speaker = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str().trim().to_string());
        markers.push((span.start(), span.end(), speaker, start_time));
    }

    let mut segments = Vec::new();
    let mut current_speaker: Option<String> = None;

    for (i, (_, end, speaker, start_time)) in markers.iter().enumerate().take(MAX_SEGMENTS) {
        if let Some(s) = speaker {
            current_speaker = Some(s.clone());
        }

        let text_end = if i + 1 < markers.len() {
            markers[i + 1].0
        } else {
            transcript.len()
        };
        let text = transcript[*end..text_end].trim();
        if text.chars().count() <= MIN_SEGMENT_TEXT_CHARS {
            continue;
        }

        segments.push(SpeakerSegment {
            speaker: current_speaker
                .clone()
                .unwrap_or_else(|| "Locuteur 1".to_string()),
            text: text.to_string(),
            start_time: start_time.clone(),
        });
    }

    // Zero or one usable segment: fall back to a naive two-party line
    // split.
    if segments.len() <= 1 && transcript.chars().count() > MIN_UNSTRUCTURED_CHARS {
        return fallback_segments(transcript);
    }

    segments
}

fn fallback_segments(transcript: &str) -> Vec<SpeakerSegment> {
    transcript
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_SEGMENT_TEXT_CHARS)
        .take(MAX_FALLBACK_SEGMENTS)
        .enumerate()
        .map(|(i, line)| SpeakerSegment {
            speaker: if i % 2 == 0 { "Locuteur 1" } else { "Locuteur 2" }.to_string(),
            text: line.to_string(),
            start_time: None,
        })
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
