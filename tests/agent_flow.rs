//! Integration tests for the model ⇄ tools loop
//!
//! Runs the full graph with a scripted chat model over an in-memory store.

mod common;

use autoware_agent::{
    agent::{AgentRunner, NodeId, TraceBus, LIMIT_NOTICE, SYSTEM_PROMPT},
    errors::AgentError,
    types::ChatMessage,
};
use common::{tool_request, tool_runtime, ScriptedModel};
use std::sync::Arc;

async fn runner(model: Arc<ScriptedModel>, max_iterations: usize) -> AgentRunner {
    AgentRunner::new(model, tool_runtime().await, max_iterations)
}

#[tokio::test]
async fn test_answer_without_tools() {
    let model = Arc::new(ScriptedModel::new(vec![ChatMessage::ai("Planning は経路を計画します。")]));
    let agent = runner(model.clone(), 3).await;

    let outcome = agent.run("Planning とは?", &[], None).await.unwrap();
    assert_eq!(outcome.answer, "Planning は経路を計画します。");
    assert_eq!(outcome.model_calls, 1);
    assert_eq!(outcome.iterations, 0);

    let prompt = model.prompt(0);
    assert_eq!(prompt[0], ChatMessage::system(SYSTEM_PROMPT));
    assert_eq!(prompt[1], ChatMessage::human("Planning とは?"));
    assert_eq!(prompt.len(), 2);
}

#[tokio::test]
async fn test_tool_round_trip() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "search_documents", r#"{"query": "planning", "k": 2}"#),
        ChatMessage::ai("answer with sources"),
    ]));
    let agent = runner(model.clone(), 3).await;

    let outcome = agent.run("Planning?", &[], None).await.unwrap();
    assert_eq!(outcome.answer, "answer with sources");
    assert_eq!(outcome.model_calls, 2);
    assert_eq!(outcome.iterations, 1);

    // human, ai(tool call), tool, ai
    assert_eq!(outcome.messages.len(), 4);
    match &outcome.messages[2] {
        ChatMessage::Tool { content, tool_call_id } => {
            assert_eq!(tool_call_id, "call_1");
            let hits: Vec<serde_json::Value> = serde_json::from_str(content).unwrap();
            assert_eq!(hits.len(), 2);
            assert_eq!(hits[0]["rank"], 1);
        }
        other => panic!("expected tool message, got {:?}", other),
    }

    // second model call sees the observation, no limit notice yet
    let prompt = model.prompt(1);
    assert_eq!(prompt.len(), 4);
    assert!(!prompt.contains(&ChatMessage::system(LIMIT_NOTICE)));
}

#[tokio::test]
async fn test_iteration_limit_stops_tools() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "list_available_components", "{}"),
        tool_request("call_2", "search_documents", r#"{"query": "perception"}"#),
    ]));
    let agent = runner(model.clone(), 1).await;

    let outcome = agent.run("Components?", &[], None).await.unwrap();
    assert_eq!(outcome.model_calls, 2);
    assert_eq!(outcome.iterations, 1);
    // the second tool request is never executed
    assert!(outcome.messages.last().unwrap().tool_calls().len() == 1);
    assert_eq!(
        outcome
            .messages
            .iter()
            .filter(|m| matches!(m, ChatMessage::Tool { .. }))
            .count(),
        1
    );

    let prompt = model.prompt(1);
    assert_eq!(prompt[0], ChatMessage::system(SYSTEM_PROMPT));
    assert_eq!(prompt[1], ChatMessage::system(LIMIT_NOTICE));
}

#[tokio::test]
async fn test_unregistered_tool_skipped() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "delete_everything", "{}"),
        ChatMessage::ai("done"),
    ]));
    let agent = runner(model.clone(), 3).await;

    let outcome = agent.run("q", &[], None).await.unwrap();
    assert_eq!(outcome.answer, "done");
    assert_eq!(outcome.iterations, 0);
    assert!(!outcome.messages.iter().any(|m| matches!(m, ChatMessage::Tool { .. })));
}

#[tokio::test]
async fn test_tool_error_becomes_observation() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "read_full_document", "not json"),
        ChatMessage::ai("sorry"),
    ]));
    let agent = runner(model, 3).await;

    let outcome = agent.run("q", &[], None).await.unwrap();
    assert_eq!(outcome.answer, "sorry");
    assert_eq!(outcome.iterations, 1);
    let observation = outcome.messages[2].content();
    assert!(observation.starts_with("Error: Invalid arguments for read_full_document"));
}

#[tokio::test]
async fn test_runaway_loop_hits_step_ceiling() {
    let model = Arc::new(ScriptedModel::repeating(tool_request("call_x", "unknown_tool", "{}")));
    let agent = runner(model.clone(), 3).await;

    let err = agent.run("q", &[], None).await.unwrap_err();
    assert!(matches!(err, AgentError::IterationLimit { steps: 8 }));
    assert_eq!(model.calls(), agent.step_ceiling());
}

#[tokio::test]
async fn test_history_precedes_question() {
    let model = Arc::new(ScriptedModel::new(vec![ChatMessage::ai("second answer")]));
    let agent = runner(model.clone(), 3).await;
    let history = vec![ChatMessage::human("first"), ChatMessage::ai("first answer")];

    let answer = agent.invoke("second", &history).await.unwrap();
    assert_eq!(answer, "second answer");

    let prompt = model.prompt(0);
    assert_eq!(&prompt[1..3], history.as_slice());
    assert_eq!(prompt[3], ChatMessage::human("second"));
}

#[tokio::test]
async fn test_trace_streams_single_run() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "search_documents", r#"{"query": "planning"}"#),
        ChatMessage::ai("traced answer"),
    ]));
    let agent = runner(model.clone(), 3).await;

    let (bus, mut receiver) = TraceBus::new();
    let outcome = agent.run("q", &[], Some(&bus)).await.unwrap();
    drop(bus);

    let mut nodes = Vec::new();
    while let Some(event) = receiver.recv().await {
        nodes.push(event.node);
    }
    assert_eq!(nodes, vec![NodeId::Model, NodeId::Tools, NodeId::Model]);
    assert_eq!(outcome.answer, "traced answer");
    assert_eq!(model.calls(), 2);
}
