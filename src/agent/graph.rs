//! Descriptive view of the agent loop for diagnostics.

use serde::Serialize;

pub const START: &str = "__start__";
pub const END: &str = "__end__";
pub const AGENT_NODE: &str = "agent";
pub const TOOLS_NODE: &str = "tools";

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: &'static str,
    pub to: &'static str,
    /// Condition label for conditional edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<&'static str>,
}

impl Edge {
    fn new(from: &'static str, to: &'static str, condition: Option<&'static str>) -> Self {
        Self { from, to, condition }
    }
}

/// Nodes and edges of the reasoning / tool-execution loop.
#[derive(Debug, Clone, Serialize)]
pub struct AgentGraph {
    pub nodes: Vec<&'static str>,
    pub edges: Vec<Edge>,
}

impl AgentGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![START, AGENT_NODE, TOOLS_NODE, END],
            edges: vec![
                Edge::new(START, AGENT_NODE, None),
                Edge::new(AGENT_NODE, TOOLS_NODE, Some("tool calls")),
                Edge::new(AGENT_NODE, END, Some("no tool calls")),
                Edge::new(TOOLS_NODE, AGENT_NODE, None),
            ],
        }
    }

    /// Render as a Mermaid flowchart.
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD;\n");
        for node in &self.nodes {
            out.push_str(&format!("\t{}({})\n", node, node));
        }
        for edge in &self.edges {
            match edge.condition {
                Some(label) => {
                    out.push_str(&format!("\t{} -. &nbsp;{}&nbsp; .-> {};\n", edge.from, label, edge.to))
                }
                None => out.push_str(&format!("\t{} --> {};\n", edge.from, edge.to)),
            }
        }
        out
    }

    /// Render as a plain node and edge listing.
    pub fn to_text(&self) -> String {
        let mut out = format!("Nodes: {}\nEdges:\n", self.nodes.join(", "));
        for edge in &self.edges {
            match edge.condition {
                Some(label) => out.push_str(&format!("  {} -> {} [{}]\n", edge.from, edge.to, label)),
                None => out.push_str(&format!("  {} -> {}\n", edge.from, edge.to)),
            }
        }
        out
    }
}

impl Default for AgentGraph {
    fn default() -> Self {
        Self::new()
    }
}
