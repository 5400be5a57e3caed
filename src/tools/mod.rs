//! Retrieval tools exposed to the agent
//!
//! - Registry of the three tool schemas advertised to the model
//! - Implementations over the vector store
//! - Retry manager (exponential backoff) shared with the API client
//! - Runtime coordinator used by the `tools` node

pub mod types;
pub mod registry;
pub mod retry;
pub mod runtime;
pub mod implementations;

// Re-export commonly used types
pub use types::{ChunkView, ComponentList, SearchHit, ToolSchema, ToolStats};
pub use registry::{ToolRegistry, TOOL_NAMES};
pub use retry::RetryManager;
pub use runtime::ToolRuntime;
