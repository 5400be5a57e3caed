//! In-process brute-force index
//!
//! Optionally mirrors its contents to `<dir>/chunks.json` after every write
//! so the last build can be inspected.

use crate::errors::{AgentError, Result};
use crate::store::index::{cosine_similarity, IndexedChunk, ScoredChunk, VectorIndex};
use crate::types::{Document, DocumentMetadata};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

const SNAPSHOT_FILE: &str = "chunks.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    id: String,
    embedding: Vec<f32>,
    chunk: Document,
}

#[derive(Debug, Default)]
struct Inner {
    dimension: usize,
    chunks: Vec<StoredChunk>,
}

/// Vectors kept in memory, searched linearly
#[derive(Debug, Default)]
pub struct MemoryIndex {
    inner: RwLock<Inner>,
    snapshot_dir: Option<PathBuf>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a JSON snapshot into `dir` after each change
    pub fn with_snapshot(dir: impl AsRef<Path>) -> Self {
        Self {
            inner: RwLock::default(),
            snapshot_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_dir.as_ref().map(|dir| dir.join(SNAPSHOT_FILE))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| AgentError::VectorStoreError("Index lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| AgentError::VectorStoreError("Index lock poisoned".to_string()))
    }

    fn persist(&self, chunks: &[StoredChunk]) -> Result<()> {
        if let Some(path) = self.snapshot_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, serde_json::to_vec(chunks)?)?;
            debug!("Index snapshot written to {}", path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn reset(&self, dimension: usize) -> Result<()> {
        let mut inner = self.write()?;
        inner.dimension = dimension;
        inner.chunks.clear();
        self.persist(&inner.chunks)
    }

    async fn upsert(&self, chunks: Vec<IndexedChunk>) -> Result<()> {
        let mut inner = self.write()?;
        for chunk in chunks {
            if inner.dimension != 0 && chunk.embedding.len() != inner.dimension {
                return Err(AgentError::VectorStoreError(format!(
                    "Expected {}-dimensional vector, got {}",
                    inner.dimension,
                    chunk.embedding.len()
                )));
            }
            let stored = StoredChunk {
                id: chunk.id,
                embedding: chunk.embedding,
                chunk: chunk.chunk,
            };
            match inner.chunks.iter_mut().find(|c| c.id == stored.id) {
                Some(existing) => *existing = stored,
                None => inner.chunks.push(stored),
            }
        }
        self.persist(&inner.chunks)
    }

    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let inner = self.read()?;
        let mut scored: Vec<ScoredChunk> = inner
            .chunks
            .iter()
            .map(|c| ScoredChunk {
                score: cosine_similarity(embedding, &c.embedding),
                chunk: c.chunk.clone(),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    async fn chunks_for(&self, doc_id: &str) -> Result<Vec<Document>> {
        let inner = self.read()?;
        Ok(inner
            .chunks
            .iter()
            .filter(|c| c.chunk.metadata.doc_id == doc_id)
            .map(|c| c.chunk.clone())
            .collect())
    }

    async fn all_metadata(&self) -> Result<Vec<DocumentMetadata>> {
        let inner = self.read()?;
        Ok(inner.chunks.iter().map(|c| c.chunk.metadata.clone()).collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
