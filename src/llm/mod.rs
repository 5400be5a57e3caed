//! Language model access
//!
//! The agent talks to the model through the [`ChatModel`] trait;
//! [`OpenAiClient`] is the production implementation.

pub mod client;
pub mod wire;

pub use client::OpenAiClient;

use crate::errors::Result;
use crate::tools::ToolSchema;
use crate::types::ChatMessage;
use async_trait::async_trait;

/// Chat model able to request tool calls
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next assistant message for the conversation
    ///
    /// Always returns a `ChatMessage::Ai`.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatMessage>;

    /// Model identifier for logs
    fn name(&self) -> &str;
}
