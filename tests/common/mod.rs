//! Shared fixtures: deterministic embedder, scripted chat model, sample corpus

#![allow(dead_code)]

use async_trait::async_trait;
use autoware_agent::{
    errors::Result,
    ingest::TextSplitter,
    llm::ChatModel,
    store::{Embedder, MemoryIndex, VectorStoreManager},
    tools::{ToolRuntime, ToolSchema},
    types::{ChatMessage, Document, DocumentMetadata, ToolCall},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const PLANNING_URL: &str = "https://autoware.example/design/planning.html";
pub const PERCEPTION_URL: &str = "https://autoware.example/design/perception.html";

const DIMENSION: usize = 64;

/// Character-bucket embedding; texts sharing characters score higher
pub struct HashEmbedder;

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0f32; DIMENSION];
                for c in text.to_lowercase().chars().filter(|c| !c.is_whitespace()) {
                    v[c as usize % DIMENSION] += 1.0;
                }
                v
            })
            .collect())
    }
}

/// Chat model replaying canned replies and recording every prompt
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ChatMessage>>,
    fallback: Option<ChatMessage>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns `reply` forever
    pub fn repeating(reply: ChatMessage) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompt(&self, index: usize) -> Vec<ChatMessage> {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSchema],
    ) -> Result<ChatMessage> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        Ok(next
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| ChatMessage::ai("script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// AI message requesting one tool call
pub fn tool_request(id: &str, name: &str, raw_arguments: &str) -> ChatMessage {
    ChatMessage::Ai {
        content: String::new(),
        tool_calls: vec![ToolCall::from_raw(id, name, raw_arguments)],
    }
}

pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "Planning コンポーネントは経路計画と行動計画を担当します。\n\n\
             Mission planning computes a route to the goal.\n\n\
             Behavior planning decides lane changes and stops."
                .repeat(3),
            DocumentMetadata::new(PLANNING_URL, "planning"),
        ),
        Document::new(
            "Perception detects objects from LiDAR and camera data.\n\n\
             物体認識は周囲の障害物を推定します。",
            DocumentMetadata::new(PERCEPTION_URL, "perception"),
        ),
    ]
}

pub async fn built_store() -> VectorStoreManager {
    let mut store = VectorStoreManager::new(
        Arc::new(HashEmbedder),
        Box::new(MemoryIndex::new()),
        TextSplitter::new(120, 20).unwrap(),
    );
    store.build(&sample_documents()).await.unwrap();
    store
}

pub async fn tool_runtime() -> Arc<ToolRuntime> {
    Arc::new(ToolRuntime::new(
        Arc::new(built_store().await),
        4,
        vec!["planning".to_string(), "perception".to_string(), "architecture".to_string()],
    ))
}
