//! Documents and chunks flowing from the loader into the vector store

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Placeholder used when a metadata field is missing
pub const UNKNOWN: &str = "unknown";

/// Metadata attached to documents and their chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    pub source_url: String,
    pub component: String,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

impl DocumentMetadata {
    pub fn new(source_url: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            component: component.into(),
            doc_id: String::new(),
            chunk_index: None,
        }
    }

    /// Fill in defaults and derive `doc_id` from the source URL
    pub fn enriched(&self) -> Self {
        let source_url = non_empty_or_unknown(&self.source_url);
        let component = non_empty_or_unknown(&self.component);
        let doc_id = if self.doc_id.is_empty() {
            doc_id_for(&source_url)
        } else {
            self.doc_id.clone()
        };
        Self {
            source_url,
            component,
            doc_id,
            chunk_index: self.chunk_index,
        }
    }
}

fn non_empty_or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Stable document id: hex SHA-256 of the source URL
pub fn doc_id_for(source_url: &str) -> String {
    hex::encode(Sha256::digest(source_url.as_bytes()))
}

/// A fetched page or a chunk of one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}
