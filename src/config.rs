use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All values have local-friendly defaults (a stock Ollama serving an
/// OpenAI-compatible endpoint). The .env file is loaded automatically
/// at startup via dotenvy.
pub struct Config {
    /// Base URL of the OpenAI-compatible embeddings API
    /// (defaults to a local Ollama at http://localhost:11434/v1).
    pub embed_api_url: String,
    /// Embedding model name passed to the provider.
    pub embed_model: String,
    /// Bearer token for hosted providers. Local servers ignore it.
    pub embed_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            embed_api_url: env::var("EMBED_API_URL")
                .unwrap_or_else(|_| "http://localhost:11434/v1".to_string()),
            embed_model: env::var("EMBED_MODEL").unwrap_or_else(|_| "all-minilm".to_string()),
            embed_api_key: env::var("EMBED_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }
}
