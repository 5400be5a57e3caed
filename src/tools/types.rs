//! Tool types
//!
//! Schemas advertised to the model, the JSON payloads the retrieval tools
//! return, and per-tool execution statistics.

use serde::{Deserialize, Serialize};

/// Maximum characters of a chunk shown in search results
pub const EXCERPT_CHARS: usize = 400;

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,

    /// Tool description shown to the model
    pub description: String,

    /// Parameter schema (JSON Schema)
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Create new tool schema
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Names of the required parameters
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// One `search_documents` result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub rank: usize,
    pub doc_id: String,
    pub component: String,
    pub source_url: String,
    pub excerpt: String,
}

/// One chunk returned by `read_full_document`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkView {
    pub index: Option<usize>,
    pub source_url: String,
    pub component: String,
    pub content: String,
}

/// `list_available_components` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentList {
    pub components: Vec<String>,
}

/// Tool execution statistics
#[derive(Debug, Clone, Default)]
pub struct ToolStats {
    /// Total executions
    pub total_executions: u64,

    /// Successful executions
    pub successful_executions: u64,

    /// Failed executions
    pub failed_executions: u64,

    /// Total execution time (ms)
    pub total_duration_ms: u64,
}

impl ToolStats {
    /// Record successful execution
    pub fn record_success(&mut self, duration_ms: u64) {
        self.total_executions += 1;
        self.successful_executions += 1;
        self.total_duration_ms += duration_ms;
    }

    /// Record failed execution
    pub fn record_failure(&mut self, duration_ms: u64) {
        self.total_executions += 1;
        self.failed_executions += 1;
        self.total_duration_ms += duration_ms;
    }

    /// Calculate average duration
    pub fn average_duration_ms(&self) -> f64 {
        if self.total_executions == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.total_executions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_schema_required() {
        let schema = ToolSchema::new(
            "read_full_document",
            "Read a document",
            serde_json::json!({"type": "object", "required": ["doc_id"]}),
        );
        assert_eq!(schema.required(), vec!["doc_id"]);

        let schema = ToolSchema::new("x", "y", serde_json::json!({"type": "object"}));
        assert!(schema.required().is_empty());
    }

    #[test]
    fn test_tool_stats_tracking() {
        let mut stats = ToolStats::default();

        stats.record_success(100);
        stats.record_success(200);
        stats.record_failure(150);

        assert_eq!(stats.total_executions, 3);
        assert_eq!(stats.successful_executions, 2);
        assert_eq!(stats.failed_executions, 1);
        assert_eq!(stats.average_duration_ms(), 150.0);
    }

    #[test]
    fn test_search_hit_keeps_non_ascii() {
        let hit = SearchHit {
            rank: 1,
            doc_id: "abc".to_string(),
            component: "planning".to_string(),
            source_url: "https://example.com".to_string(),
            excerpt: "経路計画".to_string(),
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("経路計画"));
    }
}
