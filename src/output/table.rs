use unicode_width::UnicodeWidthStr;

use crate::analysis::{rules, SpeakerSegment, Tone, TranscriptAnalysis};
use crate::input::CallRecord;
use crate::remote::AnalysisOrigin;

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Full analysis detail for `cti analyze`.
pub fn print_analysis(record: &CallRecord, origin: AnalysisOrigin, analysis: &TranscriptAnalysis) {
    println!("Call: {}", record.title);
    println!("  ID:      {}", record.id);
    if !record.date.is_empty() {
        println!("  Date:    {}", record.date);
    }
    println!("  Source:  {}", record.source);
    if let Some(ref contact) = record.contact {
        println!("  Contact: {contact}");
    }
    println!("  Origin:  {}", origin.as_str());
    println!("  Tone:    {}", analysis.tone.as_str());
    println!("  Topics:  {}", analysis.topics.join(", "));

    println!("\nSummary:");
    for line in analysis.summary.lines() {
        println!("  {line}");
    }

    if !analysis.action_items.is_empty() {
        println!("\nAction Items ({}):", analysis.action_items.len());
        for item in &analysis.action_items {
            println!("  - {}", truncate(item, 76));
        }
    }

    if !analysis.speaker_segments.is_empty() {
        println!("\nSegments ({}):", analysis.speaker_segments.len());
        print_segment_blocks(&analysis.speaker_segments);
    }
}

/// Segments for `cti segments`, optionally filtered by speaker.
pub fn print_segments(segments: &[SpeakerSegment], speaker_filter: Option<&str>) {
    if segments.is_empty() {
        println!("No segments found.");
        return;
    }

    let filtered: Vec<&SpeakerSegment> = match speaker_filter {
        Some(speaker) => {
            let lower = speaker.to_lowercase();
            segments
                .iter()
                .filter(|s| s.speaker.to_lowercase().contains(&lower))
                .collect()
        }
        None => segments.iter().collect(),
    };

    println!(
        "{} segment{}:\n",
        filtered.len(),
        if filtered.len() == 1 { "" } else { "s" }
    );
    print_segment_blocks(filtered.iter().copied());
    println!();
}

/// Utterances grouped under one speaker heading per run of turns.
fn print_segment_blocks<'a>(segments: impl IntoIterator<Item = &'a SpeakerSegment>) {
    let mut last_speaker = "";
    for seg in segments {
        if seg.speaker != last_speaker {
            if !last_speaker.is_empty() {
                println!();
            }
            match &seg.start_time {
                Some(time) => println!("  {} [{time}]:", seg.speaker),
                None => println!("  {}:", seg.speaker),
            }
            last_speaker = &seg.speaker;
        }
        println!("    {}", seg.text);
    }
}

/// One line of the `cti batch` summary table.
pub struct BatchRow {
    pub title: String,
    pub tone: Tone,
    pub topic: String,
    pub action_count: usize,
    pub origin: AnalysisOrigin,
}

/// Per-file summary table for `cti batch`.
pub fn print_batch_results(rows: &[BatchRow], failed: usize) {
    if rows.is_empty() && failed == 0 {
        println!("Nothing to analyze.");
        return;
    }

    println!(
        "{} call{} analyzed{}:\n",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" },
        if failed > 0 {
            format!(", {failed} failed")
        } else {
            String::new()
        }
    );

    println!(
        "  {:<42} {:<12} {:<26} {:>7}  {:<6}",
        "TITLE", "TONE", "TOP TOPIC", "ACTIONS", "ORIGIN"
    );
    println!("  {}", "-".repeat(97));

    for row in rows {
        println!(
            "  {:<42} {:<12} {:<26} {:>7}  {:<6}",
            truncate(&row.title, 40),
            row.tone.as_str(),
            truncate(&row.topic, 24),
            row.action_count,
            row.origin.as_str(),
        );
    }
}

/// Dump the detection ruleset for `cti rules`.
pub fn print_rules() {
    println!(
        "Tone phrases (a tone needs {} distinct hits; hostile > tense > cooperative):",
        rules::TONE_SIGNAL_THRESHOLD
    );
    println!("  cooperative: {}", rules::COOPERATIVE_PHRASES.join(", "));
    println!("  tense:       {}", rules::TENSE_PHRASES.join(", "));
    println!("  hostile:     {}", rules::HOSTILE_PHRASES.join(", "));

    println!("\nTopic taxonomy ({} categories):", rules::TOPIC_TAXONOMY.len());
    for topic in rules::TOPIC_TAXONOMY {
        println!("  {:<26} {}", topic.label, topic.triggers.join(", "));
    }
    println!("  {:<26} (fallback when nothing matches)", rules::FALLBACK_TOPIC);

    println!("\nAction-item patterns:");
    for rule in rules::ACTION_RULES {
        println!("  {:<16} {}", rule.name, rule.pattern);
    }
}
