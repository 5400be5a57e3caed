//! Tool registry with JSON schemas
//!
//! Maintains the retrieval tools advertised to the chat model.
//!
//! Tools:
//! - search_documents: Top-k similar snippets for a query
//! - read_full_document: Every cached chunk of one document
//! - list_available_components: Component names known to the agent

use crate::tools::types::ToolSchema;
use serde_json::json;

pub const SEARCH_DOCUMENTS: &str = "search_documents";
pub const READ_FULL_DOCUMENT: &str = "read_full_document";
pub const LIST_AVAILABLE_COMPONENTS: &str = "list_available_components";

/// Tool names in registration order
pub const TOOL_NAMES: [&str; 3] = [SEARCH_DOCUMENTS, READ_FULL_DOCUMENT, LIST_AVAILABLE_COMPONENTS];

/// Tool registry
///
/// Keeps registration order so the model and the visualizer see the tools
/// in the same order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolSchema>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create new tool registry with all tools
    pub fn new() -> Self {
        let mut registry = Self { tools: Vec::new() };

        registry.register_search_documents();
        registry.register_read_full_document();
        registry.register_list_available_components();

        registry
    }

    fn register_search_documents(&mut self) {
        self.tools.push(ToolSchema::new(
            SEARCH_DOCUMENTS,
            "Return top-k similar document snippets for the given query.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "k": {
                        "type": "integer",
                        "description": "Number of snippets to return (defaults to the configured top_k)",
                        "minimum": 1
                    }
                },
                "required": ["query"]
            }),
        ));
    }

    fn register_read_full_document(&mut self) {
        self.tools.push(ToolSchema::new(
            READ_FULL_DOCUMENT,
            "Return full cached chunks associated with a document id.",
            json!({
                "type": "object",
                "properties": {
                    "doc_id": {
                        "type": "string",
                        "description": "doc_id taken from a search_documents result"
                    }
                },
                "required": ["doc_id"]
            }),
        ));
    }

    fn register_list_available_components(&mut self) {
        self.tools.push(ToolSchema::new(
            LIST_AVAILABLE_COMPONENTS,
            "Return the component names currently known to the agent.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ));
    }

    /// Get tool schema by name
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check if tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All schemas in registration order
    pub fn schemas(&self) -> &[ToolSchema] {
        &self.tools
    }

    /// Tool names in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
