//! Trace events for `--trace`
//!
//! The runner emits one [`TraceEvent`] per node execution on a bounded
//! channel; the binary drains it in a printer task while the run continues.

use crate::agent::graph::NodeId;
use crate::types::ChatMessage;
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::mpsc;

/// Channel capacity
pub const TRACE_CAPACITY: usize = 100;

/// State update produced by one node
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub node: NodeId,

    /// Messages the node appended
    pub messages: Vec<ChatMessage>,

    /// Tool responses the node added to the budget
    pub iterations: usize,

    pub timestamp: DateTime<Utc>,
}

impl TraceEvent {
    pub fn new(node: NodeId, messages: Vec<ChatMessage>, iterations: usize) -> Self {
        Self {
            node,
            messages,
            iterations,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.messages.iter().map(|m| m.to_string()).collect();
        write!(f, "[{}] {{messages: [{}]", self.node, messages.join("; "))?;
        if self.node == NodeId::Tools {
            write!(f, ", iterations: {}", self.iterations)?;
        }
        write!(f, "}}")
    }
}

/// Sending half handed to the runner
#[derive(Debug, Clone)]
pub struct TraceBus {
    sender: mpsc::Sender<TraceEvent>,
}

impl TraceBus {
    /// Create new trace bus with bounded channel
    pub fn new() -> (Self, mpsc::Receiver<TraceEvent>) {
        let (sender, receiver) = mpsc::channel(TRACE_CAPACITY);
        (TraceBus { sender }, receiver)
    }

    /// Send an event, waiting while the channel is full
    ///
    /// A closed receiver is ignored; tracing never fails a run.
    pub async fn emit(&self, event: TraceEvent) {
        let _ = self.sender.send(event).await;
    }
}
