//! Vector index backends
//!
//! `QdrantIndex` talks to a Qdrant server. `MemoryIndex` keeps everything
//! in process and is used when no Qdrant URL is configured.

pub mod memory;
pub mod qdrant;

pub use memory::MemoryIndex;
pub use qdrant::QdrantIndex;

use crate::errors::Result;
use crate::types::{Document, DocumentMetadata};
use async_trait::async_trait;

/// One chunk ready to be written to the index
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub id: String,
    pub embedding: Vec<f32>,
    pub chunk: Document,
}

/// Search result with its cosine similarity
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub score: f32,
    pub chunk: Document,
}

/// Storage for embedded chunks
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Drop all contents and prepare for vectors of `dimension`
    async fn reset(&self, dimension: usize) -> Result<()>;

    async fn upsert(&self, chunks: Vec<IndexedChunk>) -> Result<()>;

    /// Top `k` chunks by cosine similarity, best first
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    /// Every chunk whose metadata carries `doc_id`, in no particular order
    async fn chunks_for(&self, doc_id: &str) -> Result<Vec<Document>>;

    /// Metadata of every stored chunk
    async fn all_metadata(&self) -> Result<Vec<DocumentMetadata>>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
