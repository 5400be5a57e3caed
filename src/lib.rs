//! autoware-agent - agentic RAG over the Autoware documentation
//!
//! Fetches documentation pages per component, indexes them in a vector
//! store and answers questions with a tool-calling model loop.
//!
//! # Architecture
//!
//! - **ingest**: page loading and recursive text splitting
//! - **store**: embeddings plus Qdrant or in-memory index
//! - **tools**: retrieval tools advertised to the model
//! - **llm**: OpenAI-compatible chat client
//! - **agent**: `model` ⇄ `tools` graph, state machine and trace stream
//! - **viz**: renderings of the agent graph

pub mod errors;
pub mod config;
pub mod logging;
pub mod types;

pub mod ingest;
pub mod store;
pub mod tools;
pub mod llm;
pub mod agent;

pub mod viz;
pub mod cli;

// Re-export commonly used types
pub use errors::{AgentError, Result};
pub use config::AppConfig;
pub use agent::{AgentRunner, TraceBus, TraceEvent};
