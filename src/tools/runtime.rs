//! Tool runtime coordinator
//!
//! Validates tool calls against the registry and routes them to the
//! retrieval implementations over a shared vector store.

use crate::errors::{AgentError, Result};
use crate::store::VectorStoreManager;
use crate::tools::implementations;
use crate::tools::registry::{
    ToolRegistry, LIST_AVAILABLE_COMPONENTS, READ_FULL_DOCUMENT, SEARCH_DOCUMENTS,
};
use crate::tools::types::{ToolSchema, ToolStats};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

/// Tool runtime coordinator
pub struct ToolRuntime {
    store: Arc<VectorStoreManager>,
    registry: ToolRegistry,
    top_k: usize,
    /// Configured component names, used when the index reports none
    components: Vec<String>,
    stats: Mutex<ToolStats>,
}

impl ToolRuntime {
    pub fn new(store: Arc<VectorStoreManager>, top_k: usize, components: Vec<String>) -> Self {
        Self {
            store,
            registry: ToolRegistry::new(),
            top_k,
            components,
            stats: Mutex::new(ToolStats::default()),
        }
    }

    /// Execute a tool and return its JSON observation
    pub async fn execute(&self, tool: &str, args: &Value) -> Result<String> {
        if !self.registry.contains(tool) {
            return Err(AgentError::UnknownTool(tool.to_string()));
        }

        let start = Instant::now();
        let result = self.dispatch(tool, args).await;
        let elapsed = start.elapsed().as_millis() as u64;

        if let Ok(mut stats) = self.stats.lock() {
            match &result {
                Ok(_) => stats.record_success(elapsed),
                Err(_) => stats.record_failure(elapsed),
            }
        }
        debug!("{} finished in {}ms (ok={})", tool, elapsed, result.is_ok());

        result
    }

    async fn dispatch(&self, tool: &str, args: &Value) -> Result<String> {
        match tool {
            SEARCH_DOCUMENTS => {
                let query = required_str(tool, args, "query")?;
                let k = match args.get("k").and_then(Value::as_u64) {
                    Some(k) if k > 0 => k as usize,
                    _ => self.top_k,
                };
                implementations::search_documents(&self.store, query, k).await
            }
            READ_FULL_DOCUMENT => {
                let doc_id = required_str(tool, args, "doc_id")?;
                implementations::read_full_document(&self.store, doc_id).await
            }
            LIST_AVAILABLE_COMPONENTS => {
                implementations::list_available_components(&self.store, &self.components).await
            }
            _ => Err(AgentError::UnknownTool(tool.to_string())),
        }
    }

    pub fn schemas(&self) -> &[ToolSchema] {
        self.registry.schemas()
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// Check if tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Snapshot of execution statistics
    pub fn stats(&self) -> ToolStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

fn required_str<'a>(tool: &str, args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::InvalidToolArgs {
            tool: tool.to_string(),
            reason: format!("missing string argument '{}'", key),
        })
}
