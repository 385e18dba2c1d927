// Embedding provider trait — the swap-ready abstraction.
//
// The similarity engine treats vectorization as a black box: chunks of
// text go in, fixed-length vectors come out, in order, one per chunk.
// The default implementation calls an OpenAI-compatible HTTP endpoint;
// tests plug in deterministic local providers.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning text chunks into dense vectors. Implementations
/// must be async because real providers sit behind HTTP APIs.
///
/// Contract the engine relies on:
/// - one output vector per input chunk, in input order;
/// - the same text always produces the same vector within a run;
/// - all vectors in a run share one dimensionality and latent space.
///
/// The pipeline calls this at most once per document per run and treats
/// any failure — including a count mismatch — as fatal for the run.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of chunks, returning vectors in the same order.
    async fn embed_chunks(&self, chunks: &[String]) -> Result<Vec<Vec<f64>>>;
}
