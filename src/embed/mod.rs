// Embedding acquisition. The engine never computes vectors itself —
// everything goes through the EmbeddingProvider trait, with an
// OpenAI-compatible HTTP endpoint as the default implementation.

pub mod openai;
pub mod traits;
