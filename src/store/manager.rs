//! Vector store manager
//!
//! Splits documents, embeds the chunks and hands them to a [`VectorIndex`].
//! Queries are answered only after a successful [`VectorStoreManager::build`].

use crate::errors::{AgentError, Result};
use crate::ingest::TextSplitter;
use crate::store::embedding::Embedder;
use crate::store::index::{IndexedChunk, VectorIndex};
use crate::types::Document;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Chunks embedded per batch
const EMBED_BATCH: usize = 64;

pub struct VectorStoreManager {
    embedder: Arc<dyn Embedder>,
    index: Box<dyn VectorIndex>,
    splitter: TextSplitter,
    built: bool,
}

impl VectorStoreManager {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Box<dyn VectorIndex>,
        splitter: TextSplitter,
    ) -> Self {
        Self {
            embedder,
            index,
            splitter,
            built: false,
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn backend(&self) -> &'static str {
        self.index.name()
    }

    /// Replace the index contents with `documents`, returning the chunk count
    pub async fn build(&mut self, documents: &[Document]) -> Result<usize> {
        let chunks = self.chunk_documents(documents);
        if chunks.is_empty() {
            return Err(AgentError::EmptyIndex);
        }
        info!(
            "Indexing {} chunks from {} documents ({} backend)",
            chunks.len(),
            documents.len(),
            self.index.name()
        );

        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(AgentError::EmbeddingError(format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    vectors.len()
                )));
            }
            embeddings.extend(vectors);
            debug!("Embedded {}/{} chunks", embeddings.len(), chunks.len());
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        self.index.reset(dimension).await?;

        let count = chunks.len();
        let indexed = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk {
                id: Uuid::new_v4().to_string(),
                embedding,
                chunk,
            })
            .collect();
        self.index.upsert(indexed).await?;

        self.built = true;
        Ok(count)
    }

    /// Top `k` chunks most similar to `query`
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        self.ensure_built()?;
        let embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&embedding, k).await?;
        Ok(hits.into_iter().map(|h| h.chunk).collect())
    }

    /// All chunks of one document, in chunk order
    pub async fn fetch_document(&self, doc_id: &str) -> Result<Vec<Document>> {
        self.ensure_built()?;
        let mut chunks = self.index.chunks_for(doc_id).await?;
        chunks.sort_by_key(|c| c.metadata.chunk_index.unwrap_or(usize::MAX));
        Ok(chunks)
    }

    /// Distinct component names present in the index, sorted
    pub async fn list_components(&self) -> Result<Vec<String>> {
        if !self.built {
            return Ok(Vec::new());
        }
        let names: BTreeSet<String> = self
            .index
            .all_metadata()
            .await?
            .into_iter()
            .map(|m| m.component)
            .filter(|c| !c.is_empty())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn ensure_built(&self) -> Result<()> {
        if self.built {
            Ok(())
        } else {
            Err(AgentError::StoreNotBuilt)
        }
    }

    fn chunk_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut chunks = Vec::new();
        for document in documents {
            let enriched = Document::new(document.content.clone(), document.metadata.enriched());
            let pieces = self.splitter.split_document(&enriched);
            for (index, mut chunk) in pieces.into_iter().enumerate() {
                chunk.metadata.chunk_index = Some(index);
                chunks.push(chunk);
            }
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::index::MemoryIndex;
    use crate::types::{doc_id_for, DocumentMetadata};
    use async_trait::async_trait;

    /// Bag-of-letters embedding, enough to rank by shared vocabulary
    struct LetterEmbedder;

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 26];
                    for c in t.to_ascii_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
                        v[(c as u8 - b'a') as usize] += 1.0;
                    }
                    v
                })
                .collect())
        }
    }

    fn manager(chunk_size: usize) -> VectorStoreManager {
        VectorStoreManager::new(
            Arc::new(LetterEmbedder),
            Box::new(MemoryIndex::new()),
            TextSplitter::new(chunk_size, 0).unwrap(),
        )
    }

    fn doc(content: &str, url: &str, component: &str) -> Document {
        Document::new(content, DocumentMetadata::new(url, component))
    }

    #[tokio::test]
    async fn test_queries_before_build() {
        let store = manager(100);
        assert!(matches!(
            store.similarity_search("x", 1).await,
            Err(AgentError::StoreNotBuilt)
        ));
        assert!(matches!(store.fetch_document("x").await, Err(AgentError::StoreNotBuilt)));
        assert!(store.list_components().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_empty_is_error() {
        let mut store = manager(100);
        assert!(matches!(store.build(&[]).await, Err(AgentError::EmptyIndex)));
        let blank = [doc("   ", "https://a", "planning")];
        assert!(matches!(store.build(&blank).await, Err(AgentError::EmptyIndex)));
        assert!(!store.is_built());
    }

    #[tokio::test]
    async fn test_fetch_document_sorted_by_chunk_index() {
        let mut store = manager(10);
        let url = "https://autoware.example/planning";
        let count = store
            .build(&[doc("aaaa bbbb cccc dddd eeee ffff", url, "planning")])
            .await
            .unwrap();
        assert!(count > 1);

        let chunks = store.fetch_document(&doc_id_for(url)).await.unwrap();
        assert_eq!(chunks.len(), count);
        let indices: Vec<usize> = chunks.iter().filter_map(|c| c.metadata.chunk_index).collect();
        assert_eq!(indices, (0..count).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_similarity_search_and_components() {
        let mut store = manager(100);
        store
            .build(&[
                doc("zzz zzz zzz", "https://a", "planning"),
                doc("qqq qqq qqq", "https://b", "perception"),
                doc("zzz qqq", "https://c", "planning"),
                doc("mmm", "https://d", ""),
            ])
            .await
            .unwrap();

        let hits = store.similarity_search("zzz", 1).await.unwrap();
        assert_eq!(hits[0].metadata.source_url, "https://a");
        assert_eq!(
            store.list_components().await.unwrap(),
            vec!["perception", "planning", "unknown"]
        );
    }
}
