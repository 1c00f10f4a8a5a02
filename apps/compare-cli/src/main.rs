//! compare-cli - annotate the differences between two PDF versions
//!
//! Reads two PDFs, diffs their extracted text line by line, and writes an
//! annotated copy of the newer version: green highlights for inserted lines,
//! yellow for replaced lines, red page markers for deletions. Prints a
//! summary (optionally JSON) and can write a plain-text changelog.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use compare_engine::annotate::{CompareConfig, MatchMode};
use describe_engine::llm::OpenAiClient;
use describe_engine::Describer;
use shared_types::ComparisonReport;

/// Timeout for a single description fallback call.
const LLM_TIMEOUT_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "compare-cli", version, about)]
struct Args {
    /// Version 1 (the older PDF)
    old: PathBuf,

    /// Version 2 (the newer PDF, which gets annotated)
    new: PathBuf,

    /// Output path for the annotated copy of version 2
    #[arg(short, long, default_value = "annotated.pdf")]
    output: PathBuf,

    /// Print the summary as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Also write a plain-text changelog to this path
    #[arg(long)]
    changelog: Option<PathBuf>,

    /// Highlight only the first occurrence of each snippet per page
    #[arg(long)]
    first_match_only: bool,

    /// Chat-completions endpoint for description fallback
    /// (default: COMPARE_LLM_URL from the environment; heuristics only when unset)
    #[arg(long)]
    llm_url: Option<String>,

    /// Model used by the description fallback
    /// (default: COMPARE_LLM_MODEL from the environment)
    #[arg(long)]
    llm_model: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("compare_cli=info,compare_engine=info")
            }),
        )
        .init();

    let args = Args::parse();

    let old_bytes = fs::read(&args.old)
        .with_context(|| format!("reading {}", args.old.display()))?;
    let new_bytes = fs::read(&args.new)
        .with_context(|| format!("reading {}", args.new.display()))?;

    let describer = build_describer(&args);
    let config = CompareConfig {
        match_mode: if args.first_match_only {
            MatchMode::FirstOnly
        } else {
            MatchMode::AllOccurrences
        },
        ..CompareConfig::default()
    };

    let report = annotate_pdf::compare_pdfs(&old_bytes, &new_bytes, &describer, &config)?;

    if report.affinity.is_suspect() {
        warn!(
            global = report.affinity.global,
            title = report.affinity.title,
            "the documents differ strongly; they may not be versions of the same document"
        );
    }

    fs::write(&args.output, &report.result.document_bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), "wrote annotated document");

    if let Some(path) = &args.changelog {
        fs::write(path, &report.changelog)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote changelog");
    }

    print_summary(&report, args.json)?;
    Ok(())
}

/// Heuristics always run; the completion fallback is attached only when an
/// endpoint is configured.
fn build_describer(args: &Args) -> Describer {
    let url = args
        .llm_url
        .clone()
        .or_else(|| std::env::var("COMPARE_LLM_URL").ok());
    let Some(url) = url else {
        return Describer::heuristics_only();
    };

    let model = args
        .llm_model
        .clone()
        .or_else(|| std::env::var("COMPARE_LLM_MODEL").ok())
        .unwrap_or_else(|| "llama-3.1-8b-instant".to_string());

    let mut client = OpenAiClient::new(&url, &model, LLM_TIMEOUT_SECS);
    if let Ok(key) = std::env::var("COMPARE_LLM_API_KEY") {
        client = client.with_api_key(&key);
    }
    info!(%url, %model, "description fallback enabled");
    Describer::with_fallback(client)
}

fn print_summary(report: &ComparisonReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report.stats)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!("Inserted lines:  {}", stats.inserted_lines);
    println!("Replaced lines:  {}", stats.replaced_lines);
    println!("Deleted lines:   {}", stats.deleted_lines);
    println!("Highlights:      {}", stats.highlights);
    if stats.not_located > 0 {
        println!("Not located:     {}", stats.not_located);
    }
    Ok(())
}
