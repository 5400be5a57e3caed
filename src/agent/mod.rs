//! Agent orchestration module
//!
//! Graph topology, run state machine, trace channel and the runner.

pub mod graph;
pub mod orchestrator;
pub mod prompt;
pub mod state;
pub mod trace;

// Re-export commonly used types
pub use graph::{route_after_model, AgentGraph, Edge, GraphState, NodeId};
pub use orchestrator::{AgentRunner, RunOutcome};
pub use prompt::{LIMIT_NOTICE, SYSTEM_PROMPT};
pub use state::{AgentState, StateEvent};
pub use trace::{TraceBus, TraceEvent, TRACE_CAPACITY};
