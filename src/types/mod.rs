//! Type definitions module
//!
//! Conversation messages and documentation chunks shared across modules.

pub mod document;
pub mod messages;

// Re-export commonly used types
pub use document::{doc_id_for, Document, DocumentMetadata};
pub use messages::{ChatMessage, ToolCall};
