//! Qdrant-backed index
//!
//! One collection, cosine distance. Each point carries the chunk text under
//! `document` plus `source_url`, `component`, `doc_id` and `chunk_index`.

use crate::errors::{AgentError, Result};
use crate::store::index::{IndexedChunk, ScoredChunk, VectorIndex};
use crate::types::{Document, DocumentMetadata};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointId, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{debug, info};

/// Points per scroll page
const SCROLL_PAGE: u32 = 256;

/// Points per upsert request
const UPSERT_BATCH: usize = 128;

fn qdrant_error(action: &'static str) -> impl Fn(qdrant_client::QdrantError) -> AgentError {
    move |e| AgentError::VectorStoreError(format!("{}: {}", action, e))
}

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    /// Connect to a Qdrant server (gRPC port, usually 6334)
    pub fn connect(url: &str, api_key: Option<String>, collection: &str) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(qdrant_error("Failed to create Qdrant client"))?;

        Ok(Self {
            client,
            collection: collection.to_string(),
        })
    }

    async fn scroll_all(&self, filter: Option<Filter>) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(&self.collection)
                .limit(SCROLL_PAGE)
                .with_payload(true);
            if let Some(filter) = filter.clone() {
                request = request.filter(filter);
            }
            if let Some(id) = offset.take() {
                request = request.offset(id);
            }

            let response = self
                .client
                .scroll(request)
                .await
                .map_err(qdrant_error("Failed to scroll points"))?;

            documents.extend(response.result.into_iter().map(|p| payload_to_document(&p.payload)));

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(documents)
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn reset(&self, dimension: usize) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| AgentError::VectorStoreError(e.to_string()))?;

        if exists {
            debug!("Dropping existing collection {}", self.collection);
            self.client
                .delete_collection(&self.collection)
                .await
                .map_err(qdrant_error("Failed to delete collection"))?;
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| {
                AgentError::VectorStoreError(format!(
                    "Failed to create collection {}: {}",
                    self.collection, e
                ))
            })?;

        info!("Created Qdrant collection {} (dim {})", self.collection, dimension);
        Ok(())
    }

    async fn upsert(&self, chunks: Vec<IndexedChunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .into_iter()
            .map(|c| PointStruct::new(c.id, c.embedding, document_payload(&c.chunk)))
            .collect();

        for batch in points.chunks(UPSERT_BATCH) {
            self.client
                .upsert_points(
                    UpsertPointsBuilder::new(&self.collection, batch.to_vec()).wait(true),
                )
                .await
                .map_err(qdrant_error("Failed to upsert points"))?;
        }

        Ok(())
    }

    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, embedding.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(qdrant_error("Failed to search points"))?;

        Ok(response
            .result
            .into_iter()
            .map(|point| {
                debug!("hit {} score {:.3}", point_id_to_string(&point.id), point.score);
                ScoredChunk {
                    score: point.score,
                    chunk: payload_to_document(&point.payload),
                }
            })
            .collect())
    }

    async fn chunks_for(&self, doc_id: &str) -> Result<Vec<Document>> {
        let filter = Filter::must([Condition::matches("doc_id", doc_id.to_string())]);
        self.scroll_all(Some(filter)).await
    }

    async fn all_metadata(&self) -> Result<Vec<DocumentMetadata>> {
        Ok(self
            .scroll_all(None)
            .await?
            .into_iter()
            .map(|d| d.metadata)
            .collect())
    }

    fn name(&self) -> &'static str {
        "qdrant"
    }
}

fn document_payload(chunk: &Document) -> HashMap<String, QdrantValue> {
    let meta = &chunk.metadata;
    let mut payload = HashMap::new();
    payload.insert("document".to_string(), QdrantValue::from(chunk.content.clone()));
    payload.insert("source_url".to_string(), QdrantValue::from(meta.source_url.clone()));
    payload.insert("component".to_string(), QdrantValue::from(meta.component.clone()));
    payload.insert("doc_id".to_string(), QdrantValue::from(meta.doc_id.clone()));
    if let Some(index) = meta.chunk_index {
        payload.insert("chunk_index".to_string(), QdrantValue::from(index as i64));
    }
    payload
}

fn payload_to_document(payload: &HashMap<String, QdrantValue>) -> Document {
    let text = |key: &str| payload.get(key).and_then(qdrant_value_to_string).unwrap_or_default();
    let chunk_index = payload
        .get("chunk_index")
        .and_then(qdrant_to_json_value)
        .and_then(|v| v.as_u64())
        .map(|i| i as usize);

    Document::new(
        text("document"),
        DocumentMetadata {
            source_url: text("source_url"),
            component: text("component"),
            doc_id: text("doc_id"),
            chunk_index,
        },
    )
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| {
        use qdrant_client::qdrant::value::Kind;
        match kind {
            Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
            Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
            Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
            Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
            _ => None,
        }
    })
}

fn qdrant_value_to_string(value: &QdrantValue) -> Option<String> {
    value.kind.as_ref().and_then(|kind| {
        use qdrant_client::qdrant::value::Kind;
        match kind {
            Kind::StringValue(s) => Some(s.clone()),
            _ => None,
        }
    })
}

fn point_id_to_string(point_id: &Option<PointId>) -> String {
    point_id
        .as_ref()
        .map(|id| {
            use qdrant_client::qdrant::point_id::PointIdOptions;
            match &id.point_id_options {
                Some(PointIdOptions::Num(n)) => n.to_string(),
                Some(PointIdOptions::Uuid(u)) => u.clone(),
                None => "unknown".to_string(),
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
