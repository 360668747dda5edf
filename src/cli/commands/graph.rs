//! Graph command - print the structure of the agent loop.

use crate::agent::AgentGraph;
use crate::cli::Output;
use anyhow::{bail, Result};

/// Render the agent loop as Mermaid or a text listing.
pub fn run_graph(format: &str, output: Option<String>) -> Result<()> {
    let graph = AgentGraph::new();

    let rendered = match format.to_lowercase().as_str() {
        "mermaid" | "mmd" => graph.to_mermaid(),
        "text" | "ascii" => graph.to_text(),
        "json" => serde_json::to_string_pretty(&graph)?,
        other => bail!("Unknown graph format: {} (expected mermaid, text or json)", other),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!("Graph saved as '{}'", path));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.mmd");

        run_graph("mermaid", Some(path.to_string_lossy().to_string())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("tools --> agent;"));
    }

    #[test]
    fn test_unknown_format() {
        assert!(run_graph("png", None).is_err());
    }
}
