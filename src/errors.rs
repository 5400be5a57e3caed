//! Error types for the Autoware documentation agent
//!
//! One error enum for the library, with a `Result` alias used by every
//! module. Binaries wrap it in `anyhow` for context.

use thiserror::Error;

/// Main error type for the agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Configuration errors (missing credential, bad values, unreadable file)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Requested components not present in the configuration
    #[error("Unknown components: {}", .0.join(", "))]
    UnknownComponents(Vec<String>),

    /// Nothing to index after loading and splitting
    #[error("No documents available to index.")]
    EmptyIndex,

    /// Query issued before `build`
    #[error("Vector store not built.")]
    StoreNotBuilt,

    /// Vector database backend errors
    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Tool requested that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool invoked with missing or malformed arguments
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidToolArgs { tool: String, reason: String },

    /// Chat / embedding API errors
    #[error("LLM API error{}: {message}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    LlmApiError { status: Option<u16>, message: String },

    /// State machine transition errors
    #[error("Invalid state transition from {from} via {event}: {reason}")]
    InvalidTransition {
        from: String,
        event: String,
        reason: String,
    },

    /// Model kept looping past the step ceiling
    #[error("Agent exceeded {steps} model steps without finishing")]
    IterationLimit { steps: usize },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Shorthand for an API error without a status code
    pub fn api(message: impl Into<String>) -> Self {
        AgentError::LlmApiError {
            status: None,
            message: message.into(),
        }
    }

    /// True for errors caused by the invocation (bad component names or
    /// configuration) rather than by the run itself
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AgentError::UnknownComponents(_) | AgentError::ConfigError(_)
        )
    }
}

/// Convert anyhow errors to AgentError
impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Generic(err.to_string())
    }
}

impl From<candle_core::Error> for AgentError {
    fn from(err: candle_core::Error) -> Self {
        AgentError::EmbeddingError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_components_lists_every_name() {
        let err = AgentError::UnknownComponents(vec!["control".to_string(), "map".to_string()]);
        assert_eq!(err.to_string(), "Unknown components: control, map");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_api_error_display() {
        let err = AgentError::LlmApiError {
            status: Some(429),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "LLM API error (HTTP 429): rate limited");

        let err = AgentError::api("boom");
        assert_eq!(err.to_string(), "LLM API error: boom");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_store_messages() {
        assert_eq!(AgentError::EmptyIndex.to_string(), "No documents available to index.");
        assert_eq!(AgentError::StoreNotBuilt.to_string(), "Vector store not built.");
    }
}
