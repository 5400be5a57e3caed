/// Mermaid `flowchart LR` of the agent loop
pub fn render(tool_names: &[&str]) -> String {
    let mut lines = vec![
        "flowchart LR".to_string(),
        "    start((User Prompt)) --> model[Agent Model]".to_string(),
        "    model --> tools[Tools]".to_string(),
        "    tools --> model".to_string(),
        "    model --> answer((Answer))".to_string(),
        "    note{Iteration limit} -.-> answer".to_string(),
        "    subgraph Toolset".to_string(),
        "        direction TB".to_string(),
    ];
    lines.extend(tool_names.iter().map(|name| format!("        {}[/{}/]", name, name)));
    lines.push("    end".to_string());
    lines.extend(tool_names.iter().map(|name| format!("    tools --> {}", name)));
    lines.join("\n")
}
