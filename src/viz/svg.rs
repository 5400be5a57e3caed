//! Static SVG diagram (900×320)
//!
//! `docs/agent_flow.svg` is this renderer's output for the default tools.

const STYLE: &str = r##"    <style>
      * { font-family: 'Inter', 'Segoe UI', sans-serif; }
      .title { font-size: 18px; font-weight: 700; fill: #0f172a; }
      .subtitle { font-size: 14px; fill: #1f2937; }
      .label { font-size: 13px; fill: #475569; }
      .bubble { fill: #f0f9ff; stroke: #38bdf8; stroke-width: 1.2; rx: 20; ry: 20; }
      .panel { fill: #f8fafc; stroke: #cbd5f5; stroke-width: 1.2; rx: 18; ry: 18; }
      .circle { fill: #f1f5f9; stroke: #94a3b8; stroke-width: 1.2; }
      .chip { fill: #e0f2fe; stroke: #0ea5e9; stroke-width: 1; rx: 12; ry: 12; }
      .chip-text { font-size: 12px; fill: #0c4a6e; font-weight: 600; }
      .note { font-size: 12px; fill: #0f172a; }
    </style>
    <marker id="arrow" markerWidth="12" markerHeight="12" refX="10" refY="4" orient="auto" markerUnits="strokeWidth">
      <path d="M0,0 L0,8 L10,4 z" fill="#0f172a" />
    </marker>
    <marker id="arrowGray" markerWidth="12" markerHeight="12" refX="10" refY="4" orient="auto" markerUnits="strokeWidth">
      <path d="M0,0 L0,8 L10,4 z" fill="#64748b" />
    </marker>"##;

/// Horizontal centre of the tools panel
const TOOLS_X: u32 = 580;

/// Line height between tool names
const TOOL_LINE_DY: u32 = 18;

pub fn render(tool_names: &[&str], max_iterations: usize) -> String {
    let tspans: Vec<String> = tool_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let dy = if i == 0 { 0 } else { TOOL_LINE_DY };
            format!(
                r#"<tspan x="{}" dy="{}">• {}</tspan>"#,
                TOOLS_X,
                dy,
                escape_xml(name)
            )
        })
        .collect();

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 900 320\" width=\"900\" height=\"320\">\n",
    );
    out.push_str("  <defs>\n");
    out.push_str(STYLE);
    out.push_str("\n  </defs>\n\n");
    out.push_str(
        "  <rect x=\"0\" y=\"0\" width=\"900\" height=\"320\" fill=\"#ffffff\" rx=\"28\" ry=\"28\"/>\n\n",
    );

    // user prompt
    out.push_str("  <circle class=\"circle\" cx=\"110\" cy=\"160\" r=\"46\"/>\n");
    out.push_str(
        "  <text class=\"title\" x=\"110\" y=\"154\" text-anchor=\"middle\">User</text>\n",
    );
    out.push_str(
        "  <text class=\"subtitle\" x=\"110\" y=\"178\" text-anchor=\"middle\">Prompt</text>\n\n",
    );

    // model node
    out.push_str("  <rect class=\"bubble\" x=\"180\" y=\"80\" width=\"260\" height=\"160\"/>\n");
    out.push_str(
        "  <text class=\"title\" x=\"310\" y=\"115\" text-anchor=\"middle\">Agent Model</text>\n",
    );
    out.push_str(
        "  <text class=\"subtitle\" x=\"310\" y=\"140\" text-anchor=\"middle\">Routes between reasoning and tools</text>\n",
    );
    out.push_str("  <rect class=\"chip\" x=\"240\" y=\"160\" width=\"140\" height=\"28\"/>\n");
    out.push_str(
        "  <text class=\"chip-text\" x=\"310\" y=\"178\" text-anchor=\"middle\">SYSTEM PROMPT</text>\n",
    );
    out.push_str(
        "  <text class=\"label\" x=\"310\" y=\"204\" text-anchor=\"middle\">Replies in Japanese with sources.</text>\n\n",
    );

    // tools node
    out.push_str("  <rect class=\"panel\" x=\"470\" y=\"80\" width=\"220\" height=\"160\"/>\n");
    out.push_str(
        "  <text class=\"title\" x=\"580\" y=\"115\" text-anchor=\"middle\">Tools</text>\n",
    );
    out.push_str(
        "  <text class=\"subtitle\" x=\"580\" y=\"140\" text-anchor=\"middle\">Agentic RAG actions</text>\n",
    );
    out.push_str("  <text class=\"label\" x=\"580\" y=\"168\" text-anchor=\"middle\">\n");
    if !tspans.is_empty() {
        out.push_str("      ");
        out.push_str(&tspans.join("\n      "));
        out.push('\n');
    }
    out.push_str("  </text>\n\n");

    // answer
    out.push_str("  <circle class=\"circle\" cx=\"780\" cy=\"160\" r=\"46\"/>\n");
    out.push_str(
        "  <text class=\"title\" x=\"780\" y=\"154\" text-anchor=\"middle\">Final</text>\n",
    );
    out.push_str(
        "  <text class=\"subtitle\" x=\"780\" y=\"178\" text-anchor=\"middle\">Answer</text>\n\n",
    );

    // edges
    for (x1, x2) in [(156, 180), (440, 470), (690, 734)] {
        out.push_str(&format!(
            "  <line x1=\"{}\" y1=\"160\" x2=\"{}\" y2=\"160\" stroke=\"#0f172a\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>\n",
            x1, x2
        ));
    }
    out.push('\n');
    out.push_str(
        "  <path d=\"M580 240 C 450 300 370 260 330 220\" fill=\"none\" stroke=\"#64748b\" stroke-width=\"2\" marker-end=\"url(#arrowGray)\" />\n\n",
    );

    // iteration limit note
    out.push_str(
        "  <rect class=\"panel\" x=\"350\" y=\"250\" width=\"200\" height=\"50\" rx=\"12\" ry=\"12\"/>\n",
    );
    out.push_str(&format!(
        "  <text class=\"note\" x=\"450\" y=\"280\" text-anchor=\"middle\">Iteration limit: {} tool rounds</text>\n",
        max_iterations
    ));
    out.push_str("</svg>\n");
    out
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
