use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use doppel::config::Config;
use doppel::corpus::loader::load_corpus;
use doppel::corpus::DocType;
use doppel::embed::openai::OpenAiEmbedder;
use doppel::output::truncate_chars;
use doppel::pipeline::{compare_texts, run_scan, ScanSettings};
use doppel::scan::CompareMode;

/// Doppel: near-duplicate document detection.
///
/// Compares dense vector representations of extracted document text to
/// find duplicates, near-duplicates, and related document groups across
/// mixed source formats (docx, pdf, pptx, xlsx).
#[derive(Parser)]
#[command(name = "doppel", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a corpus for similar pairs and clusters, writing a JSON report
    Scan {
        /// Corpus root (contains extracted_text/ and optional source folders)
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Comparison mode: all, same-type, or select
        #[arg(long, default_value = "all")]
        mode: String,

        /// Types to compare in select mode (comma-separated, e.g. docx,pdf)
        #[arg(long)]
        types: Option<String>,

        /// Minimum similarity for a pair to be retained
        #[arg(long, default_value = "0.6")]
        threshold: f64,

        /// Chunk size in words
        #[arg(long, default_value = "500")]
        chunk_size: usize,

        /// Overlap between consecutive chunks, in words
        #[arg(long, default_value = "100")]
        overlap: usize,

        /// Documents embedded concurrently (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Where to write the JSON report
        #[arg(long, default_value = "results/results.json")]
        output: PathBuf,
    },

    /// Compare two extracted text files directly
    Compare {
        /// First text file
        file1: PathBuf,

        /// Second text file
        file2: PathBuf,

        /// Chunk size in words
        #[arg(long, default_value = "500")]
        chunk_size: usize,

        /// Overlap between consecutive chunks, in words
        #[arg(long, default_value = "100")]
        overlap: usize,
    },

    /// List the corpus: documents, sizes, and type counts
    List {
        /// Corpus root (contains extracted_text/)
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("doppel=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            dir,
            mode,
            types,
            threshold,
            chunk_size,
            overlap,
            concurrency,
            output,
        } => {
            let config = Config::load()?;
            let corpus = load_corpus(&dir)?;

            println!("Loaded {} documents from {}", corpus.len(), dir.display());
            for (doc_type, count) in corpus.type_counts() {
                println!("  - {doc_type} ({count} files)");
            }

            let mode = parse_mode(&mode, types.as_deref())?;
            let settings = ScanSettings {
                chunk_size,
                overlap,
                threshold,
                mode,
                concurrency,
            };

            info!(
                url = config.embed_api_url,
                model = config.embed_model,
                "Using embedding endpoint"
            );
            let provider = OpenAiEmbedder::new(
                &config.embed_api_url,
                &config.embed_model,
                config.embed_api_key.clone(),
            );

            println!(
                "\nLooking for pairs with similarity >= {:.3} ({} mode)...",
                settings.threshold,
                settings.mode.name()
            );

            let report = run_scan(&provider, &corpus, &settings).await?;

            doppel::output::terminal::display_pairs(&report);
            doppel::output::terminal::display_clusters(&report);

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
            }
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Summary: {} pairs found, {} clusters",
                report.pairs.len(),
                report.clusters.len()
            );
            println!("Results exported to {}", output.display().to_string().bold());
        }

        Commands::Compare {
            file1,
            file2,
            chunk_size,
            overlap,
        } => {
            let config = Config::load()?;

            let text1 = fs::read_to_string(&file1)
                .with_context(|| format!("Failed to read {}", file1.display()))?;
            let text2 = fs::read_to_string(&file2)
                .with_context(|| format!("Failed to read {}", file2.display()))?;

            println!("Document 1: {} characters", text1.len());
            println!("Document 2: {} characters", text2.len());

            let provider = OpenAiEmbedder::new(
                &config.embed_api_url,
                &config.embed_model,
                config.embed_api_key.clone(),
            );

            let similarity =
                compare_texts(&provider, &text1, &text2, chunk_size, overlap).await?;

            println!("\n{} {:.4}", "Similarity score:".bold(), similarity);
            println!("  (Range: -1.0 = opposite, 0.0 = unrelated, 1.0 = identical)");
            println!("  {}", interpret_score(similarity));

            println!("\nDocument 1 preview:");
            println!("  {}", preview_line(&text1).dimmed());
            println!("\nDocument 2 preview:");
            println!("  {}", preview_line(&text2).dimmed());
        }

        Commands::List { dir } => {
            let corpus = load_corpus(&dir)?;

            if corpus.is_empty() {
                println!("No extracted documents found under {}", dir.display());
                println!("Run your extraction stage first.");
                return Ok(());
            }

            println!("\n{}", format!("=== Corpus ({} documents) ===", corpus.len()).bold());
            for doc in &corpus.documents {
                println!(
                    "  {} [{}] — {} chars",
                    doc.name,
                    doc.doc_type.to_string().dimmed(),
                    doc.text.len()
                );
            }

            println!("\nDocument types:");
            for (doc_type, count) in corpus.type_counts() {
                println!("  - {doc_type} ({count} files)");
            }
        }
    }

    Ok(())
}

/// Parse the --mode / --types flags into a comparison mode.
fn parse_mode(mode: &str, types: Option<&str>) -> Result<CompareMode> {
    match mode {
        "all" => Ok(CompareMode::All),
        "same-type" | "same_type" => Ok(CompareMode::SameType),
        "select" => {
            let raw = types.ok_or_else(|| {
                anyhow::anyhow!("select mode requires --types (e.g. --types docx,pdf)")
            })?;
            let mut selected = std::collections::BTreeSet::new();
            for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let doc_type = DocType::from_tag(tag);
                if doc_type == DocType::Unknown {
                    anyhow::bail!(
                        "Unknown type '{tag}' in --types (expected docx, pdf, pptx, or xlsx)"
                    );
                }
                selected.insert(doc_type);
            }
            if selected.is_empty() {
                anyhow::bail!("--types must name at least one type");
            }
            Ok(CompareMode::Select(selected))
        }
        other => anyhow::bail!("Unknown mode '{other}' (expected all, same-type, or select)"),
    }
}

/// Human-readable interpretation band for an ad-hoc comparison score.
fn interpret_score(similarity: f64) -> &'static str {
    if similarity >= 0.95 {
        "VERY HIGH - likely duplicates or near-duplicates"
    } else if similarity >= 0.80 {
        "HIGH - very similar content, possibly versions"
    } else if similarity >= 0.60 {
        "MODERATE - related topics or overlapping content"
    } else if similarity >= 0.40 {
        "LOW - some similarities but different content"
    } else {
        "VERY LOW - completely different documents"
    }
}

/// Single-line preview of a document's opening text.
fn preview_line(text: &str) -> String {
    truncate_chars(&text.replace('\n', " "), 200)
}
