//! CLI module for Narcissus.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Narcissus - customer support agent for Atla AI
///
/// Answers questions about Atla AI's products using a hosted chat model,
/// the Atla website and docs, and remote tools.
#[derive(Parser, Debug)]
#[command(name = "narcissus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive session (each question is answered independently)
    Chat {
        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start the HTTP API server used by the chat UI
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// List the tools bound to the model
    Tools,

    /// Print the agent loop structure
    Graph {
        /// Output format (mermaid, text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check configuration and API keys
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (secrets masked)
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["narcissus", "-v", "ask", "What is Atla AI?", "-m", "gpt-4.1"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ask { question, model } => {
                assert_eq!(question, "What is Atla AI?");
                assert_eq!(model.as_deref(), Some("gpt-4.1"));
            }
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn test_parse_graph_defaults() {
        let cli = Cli::parse_from(["narcissus", "graph"]);
        match cli.command {
            Commands::Graph { format, output } => {
                assert_eq!(format, "text");
                assert!(output.is_none());
            }
            _ => panic!("Expected Graph command"),
        }
    }
}
