use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cti::analysis;
use cti::config::{self, CtiConfig};
use cti::input::{self, CallRecord, Format};
use cti::output::{json as json_out, table};
use cti::remote::{self, AnalysisProvider};

#[derive(Parser)]
#[command(
    name = "cti",
    version,
    about = "Call Transcript Intelligence - tone, topics and action items from legal call transcripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.cti/config.toml)
    #[arg(long, global = true, env = "CTI_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one transcript (remote brain service, local rules as fallback)
    Analyze {
        /// Transcript file (text, markdown, or JSON call export)
        path: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Force format: json, markdown, text
        #[arg(long)]
        format: Option<String>,

        /// Skip the remote service and run the local ruleset only
        #[arg(long)]
        local: bool,

        /// API key for the brain service (overrides env and config)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Analyze many transcripts and print a summary table
    Batch {
        /// Files, directories or glob patterns
        paths: Vec<String>,

        /// Force format: json, markdown, text
        #[arg(long)]
        format: Option<String>,

        /// Skip the remote service and run the local ruleset only
        #[arg(long)]
        local: bool,

        /// API key for the brain service (overrides env and config)
        #[arg(long)]
        api_key: Option<String>,

        /// List what would be analyzed without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconstruct speaker segments from a transcript (always local)
    Segments {
        /// Transcript file
        path: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Force format: json, markdown, text
        #[arg(long)]
        format: Option<String>,

        /// Filter segments by speaker
        #[arg(long)]
        speaker: Option<String>,
    },

    /// Print the detection ruleset (tone phrases, topic taxonomy, action patterns)
    Rules,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version and configuration summary
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create ~/.cti/config.toml with a commented template
    Init,
    /// Show the current config with secrets redacted
    Show,
    /// Print the config file path
    Path,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;
    let config = CtiConfig::load(cli.config.as_deref())?;
    let config_file = config::effective_config_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            path,
            stdin,
            format,
            local,
            api_key,
        } => {
            let record = load_record(path.as_deref(), stdin, format.as_deref())?;
            let provider = build_provider(&config, local, api_key.as_deref())?;
            let (analysis, origin) =
                remote::analyze_with_fallback(provider.as_deref(), &record.transcript);

            if json_output {
                json_out::print_json(&json_out::AnalysisEnvelope::new(&record, origin, &analysis))?;
            } else {
                table::print_analysis(&record, origin, &analysis);
            }
        }

        Commands::Batch {
            paths,
            format,
            local,
            api_key,
            dry_run,
        } => {
            if paths.is_empty() {
                bail!("No paths provided.");
            }
            let format_enum = parse_format(format.as_deref())?;
            let files = input::collect_paths(&paths, format_enum)?;

            if dry_run {
                println!(
                    "[dry-run] Would analyze {} file{}:",
                    files.len(),
                    if files.len() == 1 { "" } else { "s" }
                );
                for file in &files {
                    println!("  {}", file.display());
                }
                return Ok(());
            }

            let provider = build_provider(&config, local, api_key.as_deref())?;
            let mut rows = Vec::new();
            let mut results = Vec::new();
            let mut failed = 0usize;

            for file in &files {
                match input::read_record(file, format_enum) {
                    Ok(record) => {
                        let (analysis, origin) =
                            remote::analyze_with_fallback(provider.as_deref(), &record.transcript);
                        if json_output {
                            results.push(serde_json::to_value(json_out::AnalysisEnvelope::new(
                                &record, origin, &analysis,
                            ))?);
                        } else {
                            rows.push(table::BatchRow {
                                title: record.title.clone(),
                                tone: analysis.tone,
                                topic: analysis.topics.first().cloned().unwrap_or_default(),
                                action_count: analysis.action_items.len(),
                                origin,
                            });
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("  FAILED {}: {e}", file.display());
                    }
                }
            }

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "total": results.len(),
                    "failed": failed,
                    "calls": results,
                }))?;
            } else {
                table::print_batch_results(&rows, failed);
            }
        }

        Commands::Segments {
            path,
            stdin,
            format,
            speaker,
        } => {
            let record = load_record(path.as_deref(), stdin, format.as_deref())?;
            let analysis = analysis::analyze(&record.transcript);

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "call": record.title,
                    "total": analysis.speaker_segments.len(),
                    "segments": analysis.speaker_segments,
                }))?;
            } else {
                println!("Call: {} ({})\n", record.title, record.id);
                table::print_segments(&analysis.speaker_segments, speaker.as_deref());
            }
        }

        Commands::Rules => {
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "tone_threshold": analysis::rules::TONE_SIGNAL_THRESHOLD,
                    "cooperative": analysis::rules::COOPERATIVE_PHRASES,
                    "tense": analysis::rules::TENSE_PHRASES,
                    "hostile": analysis::rules::HOSTILE_PHRASES,
                    "topics": analysis::rules::TOPIC_TAXONOMY,
                    "fallback_topic": analysis::rules::FALLBACK_TOPIC,
                    "action_rules": analysis::rules::ACTION_RULES,
                }))?;
            } else {
                table::print_rules();
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let created = config::init_config()?;
                let path = config::config_path()?;
                if created {
                    println!("Created {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigAction::Show => {
                if json_output {
                    json_out::print_json(&config.redacted())?;
                } else {
                    println!("{}", config.display_redacted());
                }
            }
            ConfigAction::Path => {
                println!("{}", config_file.display());
            }
        },

        Commands::Info => {
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "config_path": config_file.display().to_string(),
                    "remote_configured": config.remote.is_some(),
                    "tone_phrases": analysis::rules::COOPERATIVE_PHRASES.len()
                        + analysis::rules::TENSE_PHRASES.len()
                        + analysis::rules::HOSTILE_PHRASES.len(),
                    "topics": analysis::rules::TOPIC_TAXONOMY.len(),
                    "action_rules": analysis::rules::ACTION_RULES.len(),
                }))?;
            } else {
                println!("cti v{}", env!("CARGO_PKG_VERSION"));
                println!("  Config:       {}", config_file.display());
                match config.remote {
                    Some(ref remote) => println!("  Remote:       {}", remote.base_url),
                    None => println!("  Remote:       (none, local rules only)"),
                }
                println!(
                    "  Tone phrases: {}",
                    analysis::rules::COOPERATIVE_PHRASES.len()
                        + analysis::rules::TENSE_PHRASES.len()
                        + analysis::rules::HOSTILE_PHRASES.len()
                );
                println!("  Topics:       {}", analysis::rules::TOPIC_TAXONOMY.len());
                println!("  Action rules: {}", analysis::rules::ACTION_RULES.len());
            }
        }
    }

    Ok(())
}

fn parse_format(format: Option<&str>) -> Result<Option<Format>> {
    format
        .map(|f| {
            Format::from_str(f)
                .with_context(|| format!("Unknown format: {f}. Use: json, markdown, text"))
        })
        .transpose()
}

fn load_record(path: Option<&Path>, stdin: bool, format: Option<&str>) -> Result<CallRecord> {
    let format_enum = parse_format(format)?;
    if stdin {
        input::read_stdin(format_enum)
    } else if let Some(path) = path {
        input::read_record(path, format_enum)
    } else {
        bail!("No path provided. Use --stdin to read from stdin.");
    }
}

fn build_provider(
    config: &CtiConfig,
    local_only: bool,
    api_key_flag: Option<&str>,
) -> Result<Option<Box<dyn AnalysisProvider>>> {
    if local_only {
        return Ok(None);
    }
    let remote_cfg = match config.remote.as_ref() {
        Some(rc) => rc,
        None => return Ok(None),
    };
    let api_key = config::resolve_credential(api_key_flag, "CTI_API_KEY", Some(remote_cfg))?;
    let provider = remote::build_provider(remote_cfg, api_key)?;
    Ok(Some(provider))
}
