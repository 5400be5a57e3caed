//! Graph topology of the agent
//!
//! Two nodes, `model` and `tools`. `model` is the entry point and routes
//! conditionally to `tools` or END; `tools` always returns to `model`.
//! The runner and the visualizer both read this description.

use crate::types::ChatMessage;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Node identifiers, END included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Model,
    Tools,
    End,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Model => "model",
            NodeId::Tools => "tools",
            NodeId::End => "END",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed edge; conditional edges carry every possible target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Edge {
    Direct { from: NodeId, to: NodeId },
    Conditional { from: NodeId, targets: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentGraph {
    pub nodes: Vec<NodeId>,
    pub entry: NodeId,
    pub edges: Vec<Edge>,
}

impl AgentGraph {
    /// The model ⇄ tools loop
    pub fn standard() -> Self {
        Self {
            nodes: vec![NodeId::Model, NodeId::Tools],
            entry: NodeId::Model,
            edges: vec![
                Edge::Conditional {
                    from: NodeId::Model,
                    targets: vec![NodeId::Tools, NodeId::End],
                },
                Edge::Direct {
                    from: NodeId::Tools,
                    to: NodeId::Model,
                },
            ],
        }
    }

    /// Every possible successor of `node`
    pub fn successors(&self, node: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .flat_map(|edge| match edge {
                Edge::Direct { from, to } if *from == node => vec![*to],
                Edge::Conditional { from, targets } if *from == node => targets.clone(),
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Messages and tool-call budget of one run
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    /// Append-only conversation
    pub messages: Vec<ChatMessage>,

    /// Tool responses produced so far
    pub iterations: usize,
}

impl GraphState {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            iterations: 0,
        }
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn limit_reached(&self, max_iterations: usize) -> bool {
        self.iterations >= max_iterations
    }
}

/// Conditional edge out of `model`
pub fn route_after_model(state: &GraphState, max_iterations: usize) -> NodeId {
    let wants_tools = state.last().map(|m| !m.tool_calls().is_empty()).unwrap_or(false);
    if !wants_tools {
        return NodeId::End;
    }
    if state.limit_reached(max_iterations) {
        info!("Tool iteration limit reached; stopping further tool usage.");
        return NodeId::End;
    }
    NodeId::Tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    fn with_tool_call() -> ChatMessage {
        ChatMessage::Ai {
            content: String::new(),
            tool_calls: vec![ToolCall::from_raw("call_1", "search_documents", r#"{"query":"x"}"#)],
        }
    }

    #[test]
    fn test_standard_topology() {
        let graph = AgentGraph::standard();
        assert_eq!(graph.entry, NodeId::Model);
        assert_eq!(graph.successors(NodeId::Model), vec![NodeId::Tools, NodeId::End]);
        assert_eq!(graph.successors(NodeId::Tools), vec![NodeId::Model]);
        assert!(graph.successors(NodeId::End).is_empty());
    }

    #[test]
    fn test_route_without_tool_calls_ends() {
        let state = GraphState::new(vec![ChatMessage::human("q"), ChatMessage::ai("answer")]);
        assert_eq!(route_after_model(&state, 3), NodeId::End);
    }

    #[test]
    fn test_route_with_tool_calls() {
        let mut state = GraphState::new(vec![ChatMessage::human("q"), with_tool_call()]);
        assert_eq!(route_after_model(&state, 3), NodeId::Tools);

        state.iterations = 3;
        assert_eq!(route_after_model(&state, 3), NodeId::End);
    }

    #[test]
    fn test_route_empty_state_ends() {
        assert_eq!(route_after_model(&GraphState::default(), 3), NodeId::End);
    }

    #[test]
    fn test_node_display() {
        assert_eq!(NodeId::Model.to_string(), "model");
        assert_eq!(NodeId::End.to_string(), "END");
    }
}
