//! Embedding backends
//!
//! - `OpenAiEmbedder`: remote `/embeddings` endpoint
//! - `LocalEmbedder`: BERT sentence encoder run via Candle

pub mod local;
pub mod openai;

pub use local::LocalEmbedder;
pub use openai::OpenAiEmbedder;

use crate::config::{AppConfig, EmbeddingBackend};
use crate::errors::Result;
use crate::llm::OpenAiClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns texts into dense vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed texts, one vector per input, in input order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| {
            crate::errors::AgentError::EmbeddingError("Embedder returned no vector".to_string())
        })
    }
}

/// Build the embedder selected by the configuration
pub fn from_config(config: &AppConfig, client: &OpenAiClient) -> Result<Arc<dyn Embedder>> {
    match config.embedding_backend {
        EmbeddingBackend::OpenAi => Ok(Arc::new(OpenAiEmbedder::new(
            client.for_model(&config.embedding_model),
        ))),
        EmbeddingBackend::Local => Ok(Arc::new(LocalEmbedder::new(&config.embedding_model)?)),
    }
}
