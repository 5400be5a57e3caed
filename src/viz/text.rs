/// Numbered description of the flow followed by the tool list
pub fn render(tool_names: &[&str], max_iterations: usize) -> String {
    let mut lines = vec![
        "Agentic RAG Flow:".to_string(),
        "  1. User prompt enters the agent graph at the model node.".to_string(),
        format!(
            "  2. Agent calls tools as needed until it reaches the iteration limit ({} tool responses).",
            max_iterations
        ),
        "  3. Final answer is generated in Japanese with cited sources.".to_string(),
        String::new(),
        "Tools:".to_string(),
    ];
    lines.extend(tool_names.iter().map(|name| format!("  - {}", name)));
    lines.join("\n")
}
