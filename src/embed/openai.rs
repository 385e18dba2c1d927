// OpenAI-compatible embeddings client.
//
// Works against any server speaking the /v1/embeddings shape: OpenAI,
// Ollama, LM Studio, vLLM. The endpoint batches all of a document's
// chunks in one request, so the engine makes exactly one call per
// document per run.
//
// API shape: POST {base}/embeddings {"model": ..., "input": [...]}
// → {"data": [{"index": 0, "embedding": [...]}, ...]}

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::EmbeddingProvider;

/// Embedding provider backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiEmbedder {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbedder {
    /// Create a client for the given base URL (e.g. `http://localhost:11434/v1`)
    /// and model name. The API key is optional — local servers ignore it.
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed_chunks(&self, chunks: &[String]) -> Result<Vec<Vec<f64>>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: chunks.to_vec(),
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to call embedding endpoint {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding endpoint returned {}: {}", status, body);
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        // The API may return items out of order — reassemble by index.
        let mut items = result.data;
        items.sort_by_key(|item| item.index);

        if items.len() != chunks.len() {
            anyhow::bail!(
                "Embedding endpoint returned {} vectors for {} chunks",
                items.len(),
                chunks.len()
            );
        }

        debug!(
            chunks = chunks.len(),
            dim = items.first().map(|i| i.embedding.len()).unwrap_or(0),
            model = self.model,
            "Embedded chunk batch"
        );

        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}

// --- Embeddings API request/response types ---

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f64>,
}
