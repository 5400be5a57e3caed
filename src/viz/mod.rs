//! Renderings of the agent control-flow graph
//!
//! Every format shows the user prompt entering the agent, the `model` ⇄
//! `tools` loop, the iteration limit and one entry per registered tool.

pub mod dot;
pub mod mermaid;
pub mod svg;
pub mod text;

use clap::ValueEnum;
use std::fmt;

/// Output format of `visualize_agent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FlowFormat {
    #[default]
    Mermaid,
    Text,
    Svg,
    Dot,
}

impl fmt::Display for FlowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowFormat::Mermaid => "mermaid",
            FlowFormat::Text => "text",
            FlowFormat::Svg => "svg",
            FlowFormat::Dot => "dot",
        };
        f.write_str(name)
    }
}

/// Render the flow with the given tools and tool-round limit
pub fn render<S: AsRef<str>>(
    format: FlowFormat,
    tool_names: &[S],
    max_iterations: usize,
) -> String {
    let names: Vec<&str> = tool_names.iter().map(AsRef::as_ref).collect();
    match format {
        FlowFormat::Mermaid => mermaid::render(&names),
        FlowFormat::Text => text::render(&names, max_iterations),
        FlowFormat::Svg => svg::render(&names, max_iterations),
        FlowFormat::Dot => dot::render(&names, max_iterations),
    }
}
