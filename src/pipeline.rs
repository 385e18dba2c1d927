// Batch pipeline: validate -> chunk -> embed -> scan -> cluster -> report.
//
// One sequential pass over the corpus. The only blocking calls are the
// embedding provider invocations, which run with bounded concurrency
// (each document is embedded exactly once, all chunks batched in a
// single call). Everything after embedding is pure computation over the
// immutable document set.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::chunk::{chunk_text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::cluster::group_similar_documents;
use crate::corpus::Corpus;
use crate::embed::traits::EmbeddingProvider;
use crate::output::truncate_chars;
use crate::report::{build_report, Report};
use crate::scan::{
    find_similar_pairs, CompareMode, EmbeddedDocument, SimilarityIndex, DEFAULT_THRESHOLD,
};
use crate::similarity::max_chunk_similarity;

/// Characters of document text carried as a preview on each pair.
const PREVIEW_CHARS: usize = 100;

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub chunk_size: usize,
    pub overlap: usize,
    pub threshold: f64,
    pub mode: CompareMode,
    /// Documents embedded concurrently (provider calls in flight).
    pub concurrency: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            threshold: DEFAULT_THRESHOLD,
            mode: CompareMode::All,
            concurrency: 4,
        }
    }
}

impl ScanSettings {
    /// Reject malformed configuration and undersized input before any
    /// embedding work begins. A failed validation refuses the whole run —
    /// there is no partial result.
    pub fn validate(&self, corpus: &Corpus) -> Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be at least 1 word");
        }
        if self.overlap >= self.chunk_size {
            anyhow::bail!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap,
                self.chunk_size
            );
        }
        if !(-1.0..=1.0).contains(&self.threshold) {
            anyhow::bail!("threshold must be within [-1.0, 1.0]");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if corpus.len() < 2 {
            anyhow::bail!(
                "Need at least 2 documents to compare (found {})",
                corpus.len()
            );
        }
        if let CompareMode::Select(types) = &self.mode {
            if types.len() < 2 {
                anyhow::bail!("select mode needs at least 2 types (cross-format only)");
            }
            for doc_type in types {
                if !corpus.has_type(*doc_type) {
                    anyhow::bail!("No documents of selected type '{doc_type}' in the corpus");
                }
            }
        }
        Ok(())
    }
}

/// Run the full batch: chunk and embed every document, scan all
/// candidate pairs, cluster the retained ones, and build the report.
///
/// Provider failures — including a chunk/vector count mismatch — abort
/// the run; a report is never produced with missing vectors.
pub async fn run_scan(
    provider: &dyn EmbeddingProvider,
    corpus: &Corpus,
    settings: &ScanSettings,
) -> Result<Report> {
    settings.validate(corpus)?;

    let docs = embed_corpus(provider, corpus, settings).await?;

    info!(
        documents = docs.len(),
        threshold = settings.threshold,
        mode = settings.mode.name(),
        "Scanning candidate pairs"
    );

    let pairs = find_similar_pairs(&docs, settings.threshold, &settings.mode);
    let index = SimilarityIndex::from_pairs(&pairs);
    let clusters = group_similar_documents(&pairs, &index);

    info!(
        pairs = pairs.len(),
        clusters = clusters.len(),
        "Scan complete"
    );

    Ok(build_report(
        corpus,
        &pairs,
        &clusters,
        settings.threshold,
        &settings.mode,
    ))
}

/// Chunk and embed every document, with at most `concurrency` provider
/// calls in flight. Results come back in corpus order.
async fn embed_corpus(
    provider: &dyn EmbeddingProvider,
    corpus: &Corpus,
    settings: &ScanSettings,
) -> Result<Vec<EmbeddedDocument>> {
    let pb = ProgressBar::new(corpus.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Embedding [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let results: Vec<Result<(usize, EmbeddedDocument)>> =
        stream::iter(corpus.documents.iter().enumerate().map(|(i, doc)| {
            let pb = pb.clone();
            async move {
                let chunks = chunk_text(&doc.text, settings.chunk_size, settings.overlap);
                let embeddings = provider
                    .embed_chunks(&chunks)
                    .await
                    .with_context(|| format!("Embedding failed for {}", doc.name))?;

                if embeddings.len() != chunks.len() {
                    anyhow::bail!(
                        "Provider returned {} vectors for {} chunks of {}",
                        embeddings.len(),
                        chunks.len(),
                        doc.name
                    );
                }

                pb.inc(1);
                Ok((
                    i,
                    EmbeddedDocument {
                        name: doc.name.clone(),
                        doc_type: doc.doc_type,
                        preview: truncate_chars(&doc.text, PREVIEW_CHARS),
                        embeddings,
                    },
                ))
            }
        }))
        .buffer_unordered(settings.concurrency)
        .collect()
        .await;
    pb.finish_and_clear();

    let mut docs: Vec<(usize, EmbeddedDocument)> = results
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
    docs.sort_by_key(|(i, _)| *i);

    let total_chunks: usize = docs.iter().map(|(_, d)| d.embeddings.len()).sum();
    info!(
        documents = docs.len(),
        chunks = total_chunks,
        "Embedded corpus"
    );

    Ok(docs.into_iter().map(|(_, d)| d).collect())
}

/// Ad-hoc comparison of two raw texts: chunk both, embed both, take the
/// best chunk match. Used by the `compare` subcommand.
///
/// Chunk parameters are validated here, same as the batch path: the
/// chunker requires `overlap < chunk_size` and this is the boundary
/// where user-supplied settings enter.
pub async fn compare_texts(
    provider: &dyn EmbeddingProvider,
    text1: &str,
    text2: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<f64> {
    if chunk_size == 0 {
        anyhow::bail!("chunk_size must be at least 1 word");
    }
    if overlap >= chunk_size {
        anyhow::bail!("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})");
    }

    let chunks1 = chunk_text(text1, chunk_size, overlap);
    let chunks2 = chunk_text(text2, chunk_size, overlap);

    let emb1 = provider
        .embed_chunks(&chunks1)
        .await
        .context("Embedding failed for first document")?;
    let emb2 = provider
        .embed_chunks(&chunks2)
        .await
        .context("Embedding failed for second document")?;

    if emb1.len() != chunks1.len() || emb2.len() != chunks2.len() {
        anyhow::bail!("Provider returned a mismatched vector count");
    }

    Ok(max_chunk_similarity(&emb1, &emb2))
}
