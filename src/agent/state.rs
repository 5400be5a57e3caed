//! Agent run state machine
//!
//! Tracks where a single run is in the `model` ⇄ `tools` loop:
//! - Init → Model on Start
//! - Model → Tools on ToolCallsRequested
//! - Model → Final on Answered or LimitReached
//! - Tools → Model on ToolsComplete
//! - any non-terminal state → Error on Failure
//!
//! Terminal states absorb every event.

use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};

/// Agent execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Question received, nothing executed yet
    Init,

    /// Waiting on the chat model
    Model,

    /// Executing requested tool calls
    Tools,

    /// Answer produced (terminal)
    Final,

    /// Run aborted (terminal)
    Error,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Start,

    /// Model reply carries tool calls and the budget allows them
    ToolCallsRequested,

    /// Model reply carries no tool calls
    Answered,

    /// Model asked for tools after the tool budget was spent
    LimitReached,

    ToolsComplete,

    Failure,
}

impl AgentState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Final | AgentState::Error)
    }

    /// Attempt state transition with validation
    pub fn transition(&self, event: StateEvent) -> Result<AgentState> {
        use AgentState::*;
        use StateEvent::*;

        let next_state = match (self, event) {
            (Final, _) => Final,
            (Error, _) => Error,

            (_, Failure) => Error,

            (Init, Start) => Model,

            (Model, ToolCallsRequested) => Tools,
            (Model, Answered) => Final,
            (Model, LimitReached) => Final,

            (Tools, ToolsComplete) => Model,

            (from, event) => {
                return Err(AgentError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next_state)
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentState::Init => "Initializing",
            AgentState::Model => "Calling Model",
            AgentState::Tools => "Executing Tools",
            AgentState::Final => "Completed",
            AgentState::Error => "Error",
        }
    }
}
