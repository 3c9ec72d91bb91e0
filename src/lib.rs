//! Call Transcript Intelligence: rule-based analysis of legal call
//! transcripts (tone, topics, action items, summary, speaker segments),
//! with an optional remote brain service and a deterministic local
//! fallback ruleset.

pub mod analysis;
pub mod config;
pub mod input;
pub mod output;
pub mod remote;

pub use analysis::{analyze, SpeakerSegment, Tone, TranscriptAnalysis};
