//! Retrieval tool implementations
//!
//! Each tool reads the vector store and returns pretty-printed JSON for the
//! model. Non-ASCII text (Japanese documentation) is kept verbatim.

use crate::errors::Result;
use crate::store::VectorStoreManager;
use crate::tools::types::{ChunkView, ComponentList, SearchHit, EXCERPT_CHARS};
use tracing::debug;

/// Top-k snippets for `query`, ranked from 1
pub async fn search_documents(store: &VectorStoreManager, query: &str, k: usize) -> Result<String> {
    let documents = store.similarity_search(query, k).await?;
    debug!("search_documents({:?}, k={}) -> {} hits", query, k, documents.len());

    let hits: Vec<SearchHit> = documents
        .into_iter()
        .enumerate()
        .map(|(i, doc)| SearchHit {
            rank: i + 1,
            doc_id: doc.metadata.doc_id,
            component: doc.metadata.component,
            source_url: doc.metadata.source_url,
            excerpt: doc.content.chars().take(EXCERPT_CHARS).collect(),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&hits)?)
}

/// Every chunk of one document, in order
pub async fn read_full_document(store: &VectorStoreManager, doc_id: &str) -> Result<String> {
    let chunks = store.fetch_document(doc_id).await?;
    debug!("read_full_document({}) -> {} chunks", doc_id, chunks.len());

    let views: Vec<ChunkView> = chunks
        .into_iter()
        .map(|doc| ChunkView {
            index: doc.metadata.chunk_index,
            source_url: doc.metadata.source_url,
            component: doc.metadata.component,
            content: doc.content,
        })
        .collect();

    Ok(serde_json::to_string_pretty(&views)?)
}

/// Components present in the index, or `configured` when it has none
pub async fn list_available_components(
    store: &VectorStoreManager,
    configured: &[String],
) -> Result<String> {
    let mut components = store.list_components().await?;
    if components.is_empty() {
        components = configured.to_vec();
        components.sort();
    }
    Ok(serde_json::to_string_pretty(&ComponentList { components })?)
}
