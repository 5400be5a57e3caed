//! Message types for agent communication
//!
//! Defines the conversation exchanged between the agent graph, the chat
//! model and the retrieval tools.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Call id echoed back in the tool response
    pub id: String,

    /// Registered tool name
    pub name: String,

    /// Parsed arguments (always a JSON object)
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Build a tool call from the raw argument string sent by the API
    ///
    /// Arguments that are not valid JSON, or not a JSON object, become `{}`.
    pub fn from_raw(id: impl Into<String>, name: impl Into<String>, raw_arguments: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: parse_arguments(raw_arguments),
        }
    }
}

/// Parse tool-call arguments, falling back to an empty object
pub fn parse_arguments(raw: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        _ => serde_json::Value::Object(serde_json::Map::new()),
    }
}

/// One message in the agent conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatMessage {
    /// System instructions
    System { content: String },

    /// User question
    Human { content: String },

    /// Model reply, possibly requesting tools
    Ai {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },

    /// Tool observation answering a tool call
    Tool { content: String, tool_call_id: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System { content: content.into() }
    }

    pub fn human(content: impl Into<String>) -> Self {
        ChatMessage::Human { content: content.into() }
    }

    /// Plain AI answer without tool calls
    pub fn ai(content: impl Into<String>) -> Self {
        ChatMessage::Ai {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        ChatMessage::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Text content of the message
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System { content }
            | ChatMessage::Human { content }
            | ChatMessage::Ai { content, .. }
            | ChatMessage::Tool { content, .. } => content,
        }
    }

    /// Tool calls carried by an AI message (empty for every other role)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            ChatMessage::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Role label used on the wire and in traces
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System { .. } => "system",
            ChatMessage::Human { .. } => "user",
            ChatMessage::Ai { .. } => "assistant",
            ChatMessage::Tool { .. } => "tool",
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMessage::Ai { content, tool_calls } if !tool_calls.is_empty() => {
                let calls: Vec<String> = tool_calls
                    .iter()
                    .map(|call| format!("{}({})", call.name, call.arguments))
                    .collect();
                if content.is_empty() {
                    write!(f, "assistant -> {}", calls.join(", "))
                } else {
                    write!(f, "assistant: {} -> {}", content, calls.join(", "))
                }
            }
            ChatMessage::Tool { content, tool_call_id } => {
                write!(f, "tool[{}]: {}", tool_call_id, preview(content, 200))
            }
            other => write!(f, "{}: {}", other.role(), other.content()),
        }
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_arguments_object() {
        let raw = r#"{"query": "planning", "k": 2}"#;
        let call = ToolCall::from_raw("call_1", "search_documents", raw);
        assert_eq!(call.arguments, json!({"query": "planning", "k": 2}));
    }

    #[test]
    fn test_parse_arguments_fallbacks() {
        assert_eq!(parse_arguments("not json"), json!({}));
        assert_eq!(parse_arguments("[1, 2]"), json!({}));
        assert_eq!(parse_arguments(""), json!({}));
    }

    #[test]
    fn test_tool_calls_only_on_ai() {
        let msg = ChatMessage::Ai {
            content: String::new(),
            tool_calls: vec![ToolCall::from_raw("c", "list_available_components", "{}")],
        };
        assert_eq!(msg.tool_calls().len(), 1);
        assert!(ChatMessage::human("q").tool_calls().is_empty());
    }

    #[test]
    fn test_display_tool_message_is_truncated() {
        let msg = ChatMessage::tool("あ".repeat(300), "call_9");
        let shown = msg.to_string();
        assert!(shown.starts_with("tool[call_9]: "));
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_serde_roles() {
        let msg = ChatMessage::human("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "human");
        let back: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
