// Colored terminal output for similarity results.
//
// This module handles all terminal-specific formatting: section banners,
// level colors, metadata lines. The main.rs display paths delegate here.

use colored::Colorize;

use crate::report::{ClusterReport, Report, SimilarityLevel};

/// Display the retained pair list.
pub fn display_pairs(report: &Report) {
    println!(
        "\n{}",
        format!("=== Similar Document Pairs ({}) ===", report.pairs.len()).bold()
    );

    if report.pairs.is_empty() {
        println!(
            "\n  {}",
            "No highly similar documents found (all below threshold).".green()
        );
        return;
    }

    for pair in &report.pairs {
        println!("\n  {} {:.4}", "Similarity:".bold(), pair.similarity);
        print_document_line(&pair.doc1, pair.type1.as_str(), &pair.doc1_metadata);
        print_preview(&pair.preview1);
        print_document_line(&pair.doc2, pair.type2.as_str(), &pair.doc2_metadata);
        print_preview(&pair.preview2);
        println!("  Level: {}", colorize_level(pair.level));
        if pair.cross_format {
            println!(
                "  {}",
                format!("Cross-format match ({} vs {})", pair.type1, pair.type2).yellow()
            );
        }
    }
    println!();
}

/// Display the cluster list.
pub fn display_clusters(report: &Report) {
    if report.clusters.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("=== Document Clusters ({}) ===", report.clusters.len()).bold()
    );

    for cluster in &report.clusters {
        print_cluster(cluster);
    }
    println!();
}

fn print_cluster(cluster: &ClusterReport) {
    println!(
        "\n  Cluster {} — {} documents — {} similarity",
        cluster.cluster_id,
        cluster.size,
        colorize_level(cluster.level)
    );
    println!(
        "  Avg: {:.4} | Max: {:.4}",
        cluster.avg_similarity, cluster.max_similarity
    );
    for member in &cluster.members {
        print_document_line(&member.filename, member.doc_type.as_str(), &member.metadata);
    }
}

/// One document line with its type tag and any author/modified metadata.
fn print_document_line(name: &str, doc_type: &str, metadata: &serde_json::Value) {
    let author = metadata.get("author").and_then(|v| v.as_str());
    let modified = metadata.get("modified").and_then(|v| v.as_str());

    if author.is_some() || modified.is_some() {
        println!(
            "  - {} [{}] | Author: {} | Modified: {}",
            name,
            doc_type.dimmed(),
            author.unwrap_or("?"),
            modified.unwrap_or("?"),
        );
    } else {
        println!("  - {} [{}]", name, doc_type.dimmed());
    }
}

/// Opening text of a document, dimmed under its line.
fn print_preview(preview: &str) {
    if !preview.is_empty() {
        println!("    {}", format!("\"{preview}\"").dimmed());
    }
}

/// Colorize a similarity level tag.
fn colorize_level(level: SimilarityLevel) -> colored::ColoredString {
    match level {
        SimilarityLevel::VeryHigh => level.as_str().red().bold(),
        SimilarityLevel::High => level.as_str().bright_red(),
        SimilarityLevel::Medium => level.as_str().yellow(),
        SimilarityLevel::Low => level.as_str().green(),
    }
}
