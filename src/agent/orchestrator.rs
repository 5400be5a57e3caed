//! Agent runner - main coordinator
//!
//! Executes the `model` ⇄ `tools` graph for one question:
//! - `model` sends the system prompt (plus the limit notice once the tool
//!   budget is spent) and the conversation, and appends the reply
//! - `tools` runs each requested call in order and appends observations
//! - routing follows [`route_after_model`] and must match an edge of the
//!   [`AgentGraph`]; the run ends when the state machine turns terminal
//!
//! With a [`TraceBus`] attached every node update is streamed while the
//! same run produces the answer.

use crate::agent::graph::{route_after_model, AgentGraph, GraphState, NodeId};
use crate::agent::prompt::{LIMIT_NOTICE, SYSTEM_PROMPT};
use crate::agent::state::{AgentState, StateEvent};
use crate::agent::trace::{TraceBus, TraceEvent};
use crate::errors::{AgentError, Result};
use crate::llm::ChatModel;
use crate::tools::ToolRuntime;
use crate::types::ChatMessage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Content of the last message
    pub answer: String,

    /// Full conversation, input history included
    pub messages: Vec<ChatMessage>,

    /// Tool responses produced
    pub iterations: usize,

    /// Chat model calls made
    pub model_calls: usize,
}

pub struct AgentRunner {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRuntime>,
    graph: AgentGraph,
    max_iterations: usize,
}

impl AgentRunner {
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolRuntime>, max_iterations: usize) -> Self {
        Self {
            model,
            tools,
            graph: AgentGraph::standard(),
            max_iterations,
        }
    }

    /// Model calls allowed before the run is treated as runaway
    pub fn step_ceiling(&self) -> usize {
        2 * self.max_iterations + 2
    }

    /// Answer `question` after `history`
    pub async fn invoke(&self, question: &str, history: &[ChatMessage]) -> Result<String> {
        Ok(self.run(question, history, None).await?.answer)
    }

    /// Run the graph, streaming node updates to `trace` when given
    pub async fn run(
        &self,
        question: &str,
        history: &[ChatMessage],
        trace: Option<&TraceBus>,
    ) -> Result<RunOutcome> {
        let mut messages = history.to_vec();
        messages.push(ChatMessage::human(question));
        let mut state = GraphState::new(messages);

        let mut machine = AgentState::Init.transition(StateEvent::Start)?;
        let mut node = self.graph.entry;
        let mut model_calls = 0;

        while !machine.is_terminal() {
            let (event, next) = match node {
                NodeId::Model => {
                    if model_calls >= self.step_ceiling() {
                        let err = AgentError::IterationLimit { steps: model_calls };
                        return Err(abort(machine, err));
                    }
                    model_calls += 1;

                    let reply = match self.call_model(&state).await {
                        Ok(reply) => reply,
                        Err(e) => return Err(abort(machine, e)),
                    };
                    state.messages.push(reply.clone());
                    emit(trace, TraceEvent::new(NodeId::Model, vec![reply], 0)).await;

                    let next = route_after_model(&state, self.max_iterations);
                    let event = match next {
                        NodeId::Tools => StateEvent::ToolCallsRequested,
                        _ if state.last().map(|m| m.tool_calls().is_empty()).unwrap_or(true) => {
                            StateEvent::Answered
                        }
                        _ => StateEvent::LimitReached,
                    };
                    (event, next)
                }
                NodeId::Tools => {
                    let responses = self.execute_tools(&state).await;
                    let count = responses.len();
                    state.iterations += count;
                    state.messages.extend(responses.iter().cloned());
                    emit(trace, TraceEvent::new(NodeId::Tools, responses, count)).await;
                    (StateEvent::ToolsComplete, NodeId::Model)
                }
                NodeId::End => break,
            };

            if !self.graph.successors(node).contains(&next) {
                let err = AgentError::InvalidTransition {
                    from: node.to_string(),
                    event: format!("{:?}", event),
                    reason: format!("No edge {} -> {} in the agent graph", node, next),
                };
                return Err(abort(machine, err));
            }

            debug!("{} -> {} ({:?})", node, next, event);
            machine = machine.transition(event)?;
            node = next;
        }

        info!(
            "Run finished after {} model calls and {} tool responses",
            model_calls, state.iterations
        );

        let answer = state.last().map(|m| m.content().to_string()).unwrap_or_default();
        Ok(RunOutcome {
            answer,
            iterations: state.iterations,
            messages: state.messages,
            model_calls,
        })
    }

    async fn call_model(&self, state: &GraphState) -> Result<ChatMessage> {
        debug!("Model node invoked with {} messages", state.messages.len());

        let mut prompt = vec![ChatMessage::system(SYSTEM_PROMPT)];
        if state.limit_reached(self.max_iterations) {
            prompt.push(ChatMessage::system(LIMIT_NOTICE));
        }
        prompt.extend(state.messages.iter().cloned());

        self.model.complete(&prompt, self.tools.schemas()).await
    }

    async fn execute_tools(&self, state: &GraphState) -> Vec<ChatMessage> {
        let calls = state.last().map(|m| m.tool_calls().to_vec()).unwrap_or_default();
        let mut responses = Vec::with_capacity(calls.len());

        for call in calls {
            if !self.tools.has_tool(&call.name) {
                warn!("Tool {} requested but not registered.", call.name);
                continue;
            }
            info!("Executing tool {} with args {}", call.name, call.arguments);

            let observation = match self.tools.execute(&call.name, &call.arguments).await {
                Ok(output) => output,
                Err(e) => {
                    warn!("Tool {} failed: {}", call.name, e);
                    format!("Error: {}", e)
                }
            };
            responses.push(ChatMessage::tool(observation, call.id));
        }

        responses
    }
}

fn abort(machine: AgentState, error: AgentError) -> AgentError {
    let next = machine.transition(StateEvent::Failure).unwrap_or(AgentState::Error);
    warn!("Run aborted ({} -> {}): {}", machine.display_name(), next.display_name(), error);
    error
}

async fn emit(trace: Option<&TraceBus>, event: TraceEvent) {
    if let Some(bus) = trace {
        bus.emit(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::graph::Edge;
    use crate::ingest::TextSplitter;
    use crate::store::{Embedder, MemoryIndex, VectorStoreManager};
    use crate::tools::ToolSchema;
    use crate::types::ToolCall;
    use async_trait::async_trait;

    struct FlatEmbedder;

    #[async_trait]
    impl Embedder for FlatEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    /// Asks for the component list on every turn
    struct ToolHungryModel;

    #[async_trait]
    impl ChatModel for ToolHungryModel {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolSchema],
        ) -> Result<ChatMessage> {
            Ok(ChatMessage::Ai {
                content: String::new(),
                tool_calls: vec![ToolCall::from_raw("call_1", "list_available_components", "{}")],
            })
        }

        fn name(&self) -> &str {
            "tool-hungry"
        }
    }

    fn runner(max_iterations: usize) -> AgentRunner {
        let store = VectorStoreManager::new(
            Arc::new(FlatEmbedder),
            Box::new(MemoryIndex::new()),
            TextSplitter::new(100, 10).unwrap(),
        );
        let tools = Arc::new(ToolRuntime::new(Arc::new(store), 4, vec!["planning".to_string()]));
        AgentRunner::new(Arc::new(ToolHungryModel), tools, max_iterations)
    }

    #[tokio::test]
    async fn test_route_without_edge_is_rejected() {
        let mut agent = runner(3);
        agent.graph.edges.retain(|edge| !matches!(edge, Edge::Conditional { .. }));

        let err = agent.run("q", &[], None).await.unwrap_err();
        assert!(matches!(&err, AgentError::InvalidTransition { from, .. } if from == "model"));
    }

    #[tokio::test]
    async fn test_run_stops_once_machine_is_final() {
        let agent = runner(1);
        let outcome = agent.run("q", &[], None).await.unwrap();

        // one tool round, then the limit routes model -> END
        assert_eq!(outcome.model_calls, 2);
        assert_eq!(outcome.iterations, 1);
    }
}
