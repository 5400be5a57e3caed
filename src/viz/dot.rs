//! Graphviz DOT export
//!
//! Nodes and edges come from [`AgentGraph::standard`]; the tool cluster and
//! the prompt/answer terminals are added around them.

use crate::agent::{AgentGraph, Edge, NodeId};

pub fn render(tool_names: &[&str], max_iterations: usize) -> String {
    let graph = AgentGraph::standard();
    let mut out = String::new();

    out.push_str("digraph agent {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=rounded, fontsize=10];\n");
    out.push_str("    edge [fontsize=9];\n\n");

    out.push_str("    start [label=\"User Prompt\", shape=circle];\n");
    for node in &graph.nodes {
        out.push_str(&format!("    {} [label=\"{}\"];\n", node_id(*node), node_label(*node)));
    }
    out.push_str(&format!(
        "    {} [label=\"{}\", shape=circle];\n",
        node_id(NodeId::End),
        node_label(NodeId::End)
    ));
    out.push_str(&format!(
        "    note [label=\"Iteration limit: {} tool rounds\", shape=note];\n\n",
        max_iterations
    ));

    out.push_str(&format!("    start -> {};\n", node_id(graph.entry)));
    for edge in &graph.edges {
        match edge {
            Edge::Direct { from, to } => {
                out.push_str(&format!("    {} -> {};\n", node_id(*from), node_id(*to)));
            }
            Edge::Conditional { from, targets } => {
                for target in targets {
                    out.push_str(&format!(
                        "    {} -> {} [style=dashed, label=\"conditional\"];\n",
                        node_id(*from),
                        node_id(*target)
                    ));
                }
            }
        }
    }
    out.push_str(&format!(
        "    note -> {} [style=dotted, arrowhead=none];\n\n",
        node_id(NodeId::End)
    ));

    out.push_str("    subgraph cluster_toolset {\n");
    out.push_str("        label=\"Toolset\";\n");
    out.push_str("        style=rounded; color=\"#333333\";\n\n");
    for name in tool_names {
        out.push_str(&format!("        \"{}\" [shape=parallelogram];\n", escape(name)));
    }
    out.push_str("    }\n\n");

    for name in tool_names {
        out.push_str(&format!("    tools -> \"{}\";\n", escape(name)));
    }
    out.push_str("}\n");
    out
}

fn node_id(node: NodeId) -> &'static str {
    match node {
        NodeId::Model => "model",
        NodeId::Tools => "tools",
        NodeId::End => "answer",
    }
}

fn node_label(node: NodeId) -> &'static str {
    match node {
        NodeId::Model => "Agent Model",
        NodeId::Tools => "Tools",
        NodeId::End => "Answer",
    }
}

fn escape(s: &str) -> String {
    s.replace('"', "\\\"")
}
