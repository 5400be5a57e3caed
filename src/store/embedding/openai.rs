use crate::errors::Result;
use crate::llm::OpenAiClient;
use crate::store::embedding::Embedder;
use async_trait::async_trait;

/// Texts per `/embeddings` request
const BATCH_SIZE: usize = 64;

/// Embeddings from an OpenAI-compatible endpoint
pub struct OpenAiEmbedder {
    client: OpenAiClient,
}

impl OpenAiEmbedder {
    /// `client` must already be set to the embedding model
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            vectors.extend(self.client.embed(batch).await?);
        }
        Ok(vectors)
    }
}
