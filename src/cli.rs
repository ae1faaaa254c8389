//! Nexus CLI - Command line interface for the knowledge graph engine
//!
//! Usage:
//!   nexus classify "content" --title "Title"     Classify a single note
//!   nexus keywords "text"                        Extract keywords
//!   nexus progress --memories 12 --insights 3    Show level for totals
//!   nexus ingest notes.json                      Replay notes through the graph
//!   nexus ingest notes.json --json               Print the final graph as JSON

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use nexus::{
    EmotionalTag, IngestReport, KeywordExtractor, Nexus, NexusConfig, NoteInput, Progress,
    ProgressEngine,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Nexus - Personal knowledge graph engine")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a note's emotional tone and importance
    Classify {
        /// Note content
        content: String,

        /// Note title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Extract keywords from text
    Keywords {
        /// Text to analyze
        text: String,
    },

    /// Show level and XP for given totals
    Progress {
        /// Number of memories
        #[arg(short, long, default_value_t = 0)]
        memories: u64,

        /// Number of insights
        #[arg(short, long, default_value_t = 0)]
        insights: u64,

        /// Number of connections
        #[arg(short = 'n', long, default_value_t = 0)]
        connections: u64,
    },

    /// Ingest a JSON array of notes in order
    Ingest {
        /// Input file
        input: PathBuf,

        /// Print the resulting graph as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { content, title } => cmd_classify(&content, &title),
        Commands::Keywords { text } => cmd_keywords(&config, &text),
        Commands::Progress {
            memories,
            insights,
            connections,
        } => cmd_progress(memories, insights, connections),
        Commands::Ingest { input, json } => cmd_ingest(config, &input, json).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info,nexus=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NexusConfig> {
    match path {
        Some(path) => NexusConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(NexusConfig::default()),
    }
}

fn load_notes(path: &Path) -> anyhow::Result<Vec<NoteInput>> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let notes: Vec<NoteInput> =
        serde_json::from_str(&raw).with_context(|| format!("Invalid notes file {:?}", path))?;
    Ok(notes)
}

fn cmd_classify(content: &str, title: &str) -> anyhow::Result<()> {
    let classification = nexus::classify(content, title);

    println!(
        "{} {}",
        "Tag:".bold(),
        tag_label(classification.emotional_tag)
    );
    println!(
        "{} {}",
        "Importance:".bold(),
        format!("{}/5", classification.importance).cyan()
    );

    Ok(())
}

fn cmd_keywords(config: &NexusConfig, text: &str) -> anyhow::Result<()> {
    let keywords = KeywordExtractor::new()
        .with_max_keywords(config.max_keywords)
        .extract(text);

    if keywords.is_empty() {
        println!("{}", "No keywords found".yellow());
        return Ok(());
    }

    for keyword in keywords {
        println!("  {}", keyword.cyan());
    }

    Ok(())
}

fn cmd_progress(memories: u64, insights: u64, connections: u64) -> anyhow::Result<()> {
    let progress = nexus::calculate_progress(memories, insights, connections);
    print_progress(&progress);
    Ok(())
}

async fn cmd_ingest(config: NexusConfig, input: &Path, json: bool) -> anyhow::Result<()> {
    let notes = load_notes(input)?;
    let nexus = Nexus::new(config)?;

    if !json {
        println!(
            "{}",
            format!("Ingesting {} notes from {:?}...", notes.len(), input).bold()
        );
        println!();
    }

    for (index, note) in notes.into_iter().enumerate() {
        let report = nexus
            .ingest(note)
            .await
            .with_context(|| format!("Note #{} rejected", index + 1))?;
        if !json {
            print_report(&report);
        }
    }

    if json {
        let snapshot = nexus.snapshot().await;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "Knowledge Graph".bold().underline());
    println!("  Memories: {}", nexus.memories().await.len());
    println!("  Connections: {}", nexus.connections().await.len());
    println!("  Insights: {}", nexus.insights().await.len());
    println!();
    print_progress(&nexus.progress().await);
    println!("  {}", nexus.motivation().await.italic());

    Ok(())
}

fn print_report(report: &IngestReport) {
    let memory = &report.memory;
    println!(
        "{} {} {} | {} | {}",
        "+".green(),
        memory.id[..8].to_string().dimmed(),
        tag_label(memory.emotional_tag),
        memory.importance,
        memory.title
    );

    for connection in &report.connections {
        println!(
            "    {} {} ({}, strength {})",
            "->".blue(),
            connection.to_memory_id[..8].to_string().dimmed(),
            connection.connection_type,
            connection.strength
        );
    }

    for insight in &report.insights {
        println!(
            "    {} {} {}",
            stars(insight.stars()).yellow(),
            format!("[{}]", insight.insight_type).magenta(),
            insight.content
        );
    }

    if report.leveled_up {
        println!(
            "    {} {}",
            format!("Level {}!", report.progress.level).bold().green(),
            ProgressEngine::generate_motivation(report.progress.level)
        );
    }
}

fn print_progress(progress: &Progress) {
    println!(
        "{} {}",
        "Level:".bold(),
        progress.level.to_string().green()
    );
    println!(
        "{} {} / {} ({:.1}%)",
        "XP:".bold(),
        progress.xp,
        progress.next_level_xp,
        progress.percent()
    );
}

fn tag_label(tag: EmotionalTag) -> ColoredString {
    let label = tag.to_string();
    match tag {
        EmotionalTag::Joy => label.yellow(),
        EmotionalTag::Curiosity => label.cyan(),
        EmotionalTag::Frustration => label.red(),
        EmotionalTag::Breakthrough => label.green().bold(),
        EmotionalTag::Reflection => label.blue(),
    }
}

fn stars(count: u8) -> String {
    let filled = count as usize;
    format!("{}{}", "*".repeat(filled), ".".repeat(5 - filled.min(5)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_notes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"title": "Eureka moment", "content": "I finally discovered the pattern"}},
                {{"title": "Pattern exploration", "content": "Still exploring this pattern deeply",
                  "created_at": "2024-03-01T10:00:00Z"}}
            ]"#
        )
        .unwrap();

        let notes = load_notes(file.path()).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Eureka moment");
        assert!(notes[0].created_at.is_none());
        assert!(notes[1].created_at.is_some());
    }

    #[test]
    fn test_load_notes_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "not an array"}}"#).unwrap();
        assert!(load_notes(file.path()).is_err());
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), NexusConfig::default());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_connections": 2}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.max_keywords, 10);
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["nexus", "-v", "ingest", "notes.json", "--json"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Ingest { input, json } => {
                assert_eq!(input, PathBuf::from("notes.json"));
                assert!(json);
            }
            _ => panic!("expected ingest"),
        }

        let cli = Cli::try_parse_from(["nexus", "progress", "-m", "10", "-n", "2"]).unwrap();
        match cli.command {
            Commands::Progress {
                memories,
                insights,
                connections,
            } => assert_eq!((memories, insights, connections), (10, 0, 2)),
            _ => panic!("expected progress"),
        }
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), ".....");
        assert_eq!(stars(3), "***..");
        assert_eq!(stars(5), "*****");
    }
}
