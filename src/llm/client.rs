//! OpenAI-compatible API client
//!
//! - Endpoint: POST {base_url}/chat/completions (tool calling, temperature 0)
//! - Endpoint: POST {base_url}/embeddings
//! - Bearer authentication, per-request timeout, bounded retries

use crate::config::AppConfig;
use crate::errors::{AgentError, Result};
use crate::llm::wire::{
    ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest, EmbeddingResponse, WireMessage,
    WireTool,
};
use crate::llm::ChatModel;
use crate::tools::{RetryManager, ToolSchema};
use crate::types::ChatMessage;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// OpenAI-compatible client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    retry: RetryManager,
}

impl OpenAiClient {
    /// Create a client for the configured chat model
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_config(
            &config.base_url,
            &config.openai_api_key,
            &config.chat_model,
            config.request_timeout(),
            config.max_retries,
        )
    }

    /// Create client with explicit settings
    pub fn with_config(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AgentError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            retry: RetryManager::new(max_retries),
        })
    }

    /// Same connection settings, different model (used for embeddings)
    pub fn for_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat completion request and return the assistant reply
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatMessage> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: 0.0,
            tools: tools.iter().map(WireTool::from).collect(),
        };

        debug!(
            "chat/completions: model={} messages={} tools={}",
            self.model,
            request.messages.len(),
            request.tools.len()
        );

        let response: ChatCompletionResponse = self
            .retry
            .run("chat/completions", || self.post_json("chat/completions", &request))
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::api("Response contained no choices"))?;

        debug!("finish_reason={:?}", choice.finish_reason);
        Ok(choice.message.into_ai_message())
    }

    /// Embed a batch of texts, preserving input order
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbeddingResponse = self
            .retry
            .run("embeddings", || self.post_json("embeddings", &request))
            .await?;

        let mut data = response.data;
        if data.len() != texts.len() {
            return Err(AgentError::EmbeddingError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                data.len()
            )));
        }
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout {
                        duration_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    AgentError::HttpError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(api_error(status, &error_text));
        }

        let text = response.text().await.map_err(AgentError::HttpError)?;
        serde_json::from_str(&text)
            .map_err(|e| AgentError::api(format!("Failed to parse {} response: {}", path, e)))
    }
}

fn api_error(status: StatusCode, body: &str) -> AgentError {
    // OpenAI wraps errors as {"error": {"message": ...}}
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string());

    AgentError::LlmApiError {
        status: Some(status.as_u16()),
        message,
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatMessage> {
        self.chat(messages, tools).await
    }

    fn name(&self) -> &str {
        &self.model
    }
}
