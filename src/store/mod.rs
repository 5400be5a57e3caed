//! Vector store: embedders, index backends and the manager on top

pub mod embedding;
pub mod index;
pub mod manager;

pub use embedding::{Embedder, LocalEmbedder, OpenAiEmbedder};
pub use index::{IndexedChunk, MemoryIndex, QdrantIndex, ScoredChunk, VectorIndex};
pub use manager::VectorStoreManager;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::ingest::TextSplitter;
use crate::llm::OpenAiClient;
use tracing::info;

/// Index backend for the configuration: Qdrant when a URL is set
pub fn index_from_config(config: &AppConfig) -> Result<Box<dyn VectorIndex>> {
    match &config.qdrant_url {
        Some(url) => {
            info!("Using Qdrant at {} (collection {})", url, config.collection);
            Ok(Box::new(QdrantIndex::connect(
                url,
                config.qdrant_api_key.clone(),
                &config.collection,
            )?))
        }
        None => Ok(Box::new(MemoryIndex::with_snapshot(&config.index_dir))),
    }
}

/// Unbuilt store wired from the configuration
pub fn from_config(config: &AppConfig, client: &OpenAiClient) -> Result<VectorStoreManager> {
    let embedder = embedding::from_config(config, client)?;
    let index = index_from_config(config)?;
    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap)?;
    Ok(VectorStoreManager::new(embedder, index, splitter))
}
